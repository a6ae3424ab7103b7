use std::path::PathBuf;

use clap::Parser;

/// quadgl — batched textured-quad renderer demo.
#[derive(Parser, Debug)]
#[command(name = "quadgl", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of frames to render before exiting.
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    /// Number of quads laid out on the demo grid.
    #[arg(long, default_value_t = 3)]
    pub quads: usize,

    /// Image file to texture quads with. Repeat for several textures.
    #[arg(short, long = "texture")]
    pub textures: Vec<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["quadgl"]).unwrap();
        assert_eq!(args.frames, 120);
        assert_eq!(args.quads, 3);
        assert!(args.textures.is_empty());
        assert!(args.config.is_none());
        assert!(!args.print_config);
    }

    #[test]
    fn repeated_textures() {
        let args = Args::try_parse_from([
            "quadgl",
            "--texture",
            "a.png",
            "-t",
            "b.png",
            "--frames",
            "10",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(
            args.textures,
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert_eq!(args.frames, 10);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_bad_frame_count() {
        assert!(Args::try_parse_from(["quadgl", "--frames", "-3"]).is_err());
    }
}
