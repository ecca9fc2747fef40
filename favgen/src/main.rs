use anyhow::Result;
use clap::{Parser, Subcommand};
use favgen::{optimize, Artifact, Favicon};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
    tracing_log::LogTracer::init().ok();
    let env = std::env::var("FAVGEN_LOG").unwrap_or_else(|_| "error".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_span_events(FmtSpan::ACTIVE | FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    log_panics::init();
    let args = Args::parse();
    args.command.run()
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a complete favicon set from a source image
    Generate {
        /// Source image file
        source: PathBuf,
        /// Output directory, created if absent
        #[clap(short, long, default_value = "public")]
        output: PathBuf,
        /// Site name written into the web manifest
        #[clap(short, long, default_value = "My Site")]
        name: String,
        /// Theme color (hex) written into the web manifest
        #[clap(short, long, default_value = "#000000")]
        theme: String,
        /// Write a site.webmanifest next to the icons (the default)
        #[clap(long, overrides_with = "no_manifest")]
        manifest: bool,
        /// Skip the site.webmanifest
        #[clap(long, overrides_with = "manifest")]
        no_manifest: bool,
    },
    /// Convert an image to webp for the web, optionally resizing it
    Optimize {
        /// Input image file
        input: PathBuf,
        /// Output path, defaults to the input with a .webp extension
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Target width in pixels
        #[clap(short, long)]
        width: Option<u32>,
        /// Target height in pixels
        #[clap(short = 'H', long)]
        height: Option<u32>,
        /// Webp quality, 1-100
        #[clap(short, long, default_value_t = 85)]
        quality: u8,
    },
    /// Generate multiple webp sizes from a named preset
    Preset {
        /// Input image file
        input: PathBuf,
        /// Preset name, e.g. favicon, icon-set, og, twitter, social, thumb
        preset: String,
        /// Output directory, defaults to the input's directory
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
        /// Webp quality, 1-100
        #[clap(short, long, default_value_t = 85)]
        quality: u8,
        /// Output filename prefix, defaults to the input file stem
        #[clap(short, long)]
        prefix: Option<String>,
    },
    /// Show image info (dimensions, format, size)
    Info {
        /// Input image file
        input: PathBuf,
    },
    /// List available size presets
    Presets,
}

impl Commands {
    fn run(self) -> Result<()> {
        match self {
            Self::Generate {
                source,
                output,
                name,
                theme,
                manifest: _,
                no_manifest,
            } => {
                let mut favicon = Favicon::new(&source, &output)?;
                let (width, height) = favicon.source_dimensions();
                println!("Loaded: {} ({}x{})", source.display(), width, height);
                println!("Output: {}/", output.display());
                println!();
                favicon.add_pngs()?;
                favicon.add_ico()?;
                if !no_manifest {
                    favicon.add_webmanifest(&name, &theme)?;
                }
                let artifacts = favicon.finish();
                for artifact in &artifacts {
                    println!("✓ {}", summarize(artifact));
                }
                println!();
                println!("Generated {} files", artifacts.len());
                println!();
                println!("Next.js metadata config:");
                println!("{}", "=".repeat(60));
                println!("{}", NEXTJS_SNIPPET);
            }
            Self::Optimize {
                input,
                output,
                width,
                height,
                quality,
            } => {
                let report = optimize::optimize(&input, output.as_deref(), width, height, quality)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Self::Preset {
                input,
                preset,
                output_dir,
                quality,
                prefix,
            } => {
                let preset = optimize::preset(&preset)?;
                let report = optimize::apply_preset(
                    &input,
                    preset,
                    output_dir.as_deref(),
                    quality,
                    prefix.as_deref(),
                )?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Self::Info { input } => {
                let report = optimize::info(&input)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Self::Presets => {
                let table: serde_json::Map<String, serde_json::Value> = optimize::PRESETS
                    .iter()
                    .map(|preset| {
                        let sizes: Vec<serde_json::Value> = preset
                            .sizes
                            .iter()
                            .map(|&(width, height)| {
                                serde_json::json!({ "width": width, "height": height })
                            })
                            .collect();
                        (preset.name.to_string(), serde_json::Value::from(sizes))
                    })
                    .collect();
                let listing = serde_json::json!({ "presets": table });
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
        }
        Ok(())
    }
}

// Copy-paste block for wiring the generated files into a Next.js app.
const NEXTJS_SNIPPET: &str = r#"
icons: {
  icon: [
    { url: "/favicon-16x16.png", sizes: "16x16", type: "image/png" },
    { url: "/favicon-32x32.png", sizes: "32x32", type: "image/png" },
    { url: "/favicon-48x48.png", sizes: "48x48", type: "image/png" },
    { url: "/favicon.ico", sizes: "any" },
  ],
  apple: [
    { url: "/apple-touch-icon.png", sizes: "180x180", type: "image/png" },
  ],
  other: [
    { rel: "icon", url: "/favicon-192x192.png", sizes: "192x192" },
    { rel: "icon", url: "/favicon-512x512.png", sizes: "512x512" },
  ],
},
manifest: "/site.webmanifest",
"#;

fn summarize(artifact: &Artifact) -> String {
    let dimensions = match artifact.dimensions {
        Some((width, height)) => format!("{}x{}", width, height),
        None => "-".to_string(),
    };
    format!(
        "{:<30} {:>9} {:>8} bytes",
        artifact.name, dimensions, artifact.size
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let args = Args::try_parse_from(["favgen", "generate", "logo.png"]).unwrap();
        match args.command {
            Commands::Generate {
                output,
                name,
                theme,
                no_manifest,
                ..
            } => {
                assert_eq!(output, PathBuf::from("public"));
                assert_eq!(name, "My Site");
                assert_eq!(theme, "#000000");
                assert!(!no_manifest);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn preset_defaults() {
        let args = Args::try_parse_from(["favgen", "preset", "logo.png", "favicon"]).unwrap();
        match args.command {
            Commands::Preset {
                preset,
                output_dir,
                quality,
                prefix,
                ..
            } => {
                assert_eq!(preset, "favicon");
                assert!(output_dir.is_none());
                assert_eq!(quality, 85);
                assert!(prefix.is_none());
            }
            _ => panic!("expected preset"),
        }
    }

    #[test]
    fn manifest_flags_override_each_other() {
        let args =
            Args::try_parse_from(["favgen", "generate", "logo.png", "--no-manifest", "--manifest"])
                .unwrap();
        match args.command {
            Commands::Generate { no_manifest, .. } => assert!(!no_manifest),
            _ => panic!("expected generate"),
        }
    }
}
