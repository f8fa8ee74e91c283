//! CLI dispatch for the `snow textures` command.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::texture::{texture_path, TextureSet};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// One loaded mask, as reported by `--json`.
#[derive(Debug, Serialize)]
struct TextureInfo {
    index: usize,
    file: String,
    width: u32,
    height: u32,
    /// Pixels with non-zero alpha
    coverage: usize,
}

fn describe(dir: &Path, prefix: &str, set: &TextureSet) -> Vec<TextureInfo> {
    set.iter()
        .enumerate()
        .map(|(index, mask)| TextureInfo {
            index,
            file: texture_path(dir, prefix, index).display().to_string(),
            width: mask.width(),
            height: mask.height(),
            coverage: mask.pixels().filter(|p| p[3] > 0).count(),
        })
        .collect()
}

/// Execute the textures command.
pub fn run_textures(dir: &Path, prefix: &str, json: bool) -> ExitCode {
    let set = match TextureSet::load(dir, prefix) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let infos = describe(dir, prefix, &set);
    if json {
        let doc = serde_json::json!({ "count": infos.len(), "textures": infos });
        match serde_json::to_string_pretty(&doc) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for info in &infos {
            println!(
                "{:>3}  {:>4}x{:<4}  {:>6} px  {}",
                info.index, info.width, info.height, info.coverage, info.file
            );
        }
        println!("{} texture(s)", infos.len());
    }

    ExitCode::from(EXIT_SUCCESS)
}
