//! Info command implementations (targets)

use std::process::ExitCode;

use crate::registry::Registry;

use super::EXIT_SUCCESS;

/// Run the targets command
pub fn run_targets() -> ExitCode {
    let registry = Registry::builtin();

    println!("Registered target platforms:");
    println!();
    for (token, spec) in registry.entries() {
        let shape = if spec.name_executable {
            if spec.extension.is_empty() {
                "named executable".to_string()
            } else {
                format!("named executable, {}", spec.extension)
            }
        } else {
            "artifact folder".to_string()
        };
        println!(
            "  {:<8} {:<20} {:<13} ({})",
            token,
            spec.platform_id.to_string(),
            spec.output_folder.display().to_string(),
            shape
        );
    }
    println!();
    println!("Usage: unibuild build <target>");
    ExitCode::from(EXIT_SUCCESS)
}
