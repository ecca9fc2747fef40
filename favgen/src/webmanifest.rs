use anyhow::Result;
use serde::Serialize;

/// The PWA descriptor written next to the icons, consumed by browsers and
/// installers. Distinct from the artifact list the pipeline returns.
#[derive(Debug, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<ManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl WebManifest {
    pub fn new(name: &str, theme_color: &str) -> Self {
        let icons = [192, 512]
            .iter()
            .map(|px| ManifestIcon {
                src: format!("/favicon-{px}x{px}.png"),
                sizes: format!("{px}x{px}"),
                mime_type: "image/png".into(),
            })
            .collect();
        Self {
            name: name.into(),
            short_name: name.into(),
            icons,
            theme_color: theme_color.into(),
            background_color: "#ffffff".into(),
            display: "standalone".into(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut json = serde_json::to_vec_pretty(self)?;
        json.push(b'\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_content() -> Result<()> {
        let manifest = WebManifest::new("Example", "#112233");
        let value: serde_json::Value = serde_json::from_slice(&manifest.to_json()?)?;
        assert_eq!(value["name"], "Example");
        assert_eq!(value["short_name"], "Example");
        assert_eq!(value["theme_color"], "#112233");
        assert_eq!(value["background_color"], "#ffffff");
        assert_eq!(value["display"], "standalone");
        assert_eq!(value["icons"][0]["src"], "/favicon-192x192.png");
        assert_eq!(value["icons"][0]["sizes"], "192x192");
        assert_eq!(value["icons"][0]["type"], "image/png");
        assert_eq!(value["icons"][1]["src"], "/favicon-512x512.png");
        Ok(())
    }
}
