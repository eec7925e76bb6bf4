//! Safety utilities to prevent clobbering inputs.
//!
//! The builder and the counter both write a JSON file next to files they
//! read. These checks stop a mistyped `--output` from overwriting the listing
//! or a lyrics file.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output file name must end with the required extension (e.g. "json")
/// - Output cannot be the same as any of the provided source paths
/// - Output cannot live inside any of the protected directories
pub fn validate_output_path(
    output: &Path,
    required_extension: &str,
    source_paths: &[&Path],
    protected_dirs: &[&Path],
) -> Result<()> {
    let extension = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !extension.eq_ignore_ascii_case(required_extension) {
        bail!(
            "Safety check failed: output file '{}' must have a .{} extension",
            output.display(),
            required_extension
        );
    }

    for source in source_paths {
        if output == *source {
            bail!(
                "Safety check failed: output '{}' cannot be the same as source '{}'",
                output.display(),
                source.display()
            );
        }
    }

    for dir in protected_dirs {
        if output.starts_with(dir) {
            bail!(
                "Safety check failed: output '{}' cannot be written inside '{}'",
                output.display(),
                dir.display()
            );
        }
    }

    Ok(())
}
