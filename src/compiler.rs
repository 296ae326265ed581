//! Instruction compiler: the deterministic mapping from a GenerationConfig
//! to the natural-language prompt sent to the model.
//!
//! The compiler is a total, side-effect-free function of the config record.
//! Clause order is a fixed table so identical configs always produce
//! identical prompts. `temperature` and `max_tokens` are model-call
//! parameters and never appear in the instruction text.

use crate::config::{
    DetailLevel, FileEncoding, GenerationConfig, LoggingLevel, ScriptType, SecurityLevel,
    Verbosity,
};
use crate::error::GenResult;

/// Compile a validated config into a single instruction string.
///
/// Fails with `GenError::InvalidConfig` when the record does not validate
/// (empty task, out-of-range temperature or max_tokens, unknown model).
pub fn compile(config: &GenerationConfig) -> GenResult<String> {
    config.validate()?;

    let mut prompt = String::with_capacity(1024);

    // Role/context preamble, always present
    prompt.push_str(
        "You are a PowerShell expert. Generate a single PowerShell script that accomplishes the task below.\n",
    );
    prompt.push_str(&format!(
        "Target environment: PowerShell {} on {}.\n\n",
        config.powershell_version.label(),
        config.target_os.label()
    ));

    // Task description, verbatim; a preset is prepended, never substituted
    prompt.push_str("Task: ");
    if let Some(preset) = config.prompt_preset {
        prompt.push_str(preset.template());
        prompt.push_str(", ");
    }
    prompt.push_str(&config.task_description);
    prompt.push('\n');

    // Constraint clauses for every non-default field, fixed order
    let clauses = constraint_clauses(config);
    if !clauses.is_empty() {
        prompt.push_str("\nConstraints:\n");
        for clause in clauses {
            prompt.push_str("- ");
            prompt.push_str(clause);
            prompt.push('\n');
        }
    }

    // Output-format directive, always last
    prompt.push_str(
        "\nRespond with PowerShell code only, inside a single ```powershell fenced block, with no text before or after it.\n",
    );

    Ok(prompt)
}

/// The fixed field-to-clause table. Default values contribute nothing.
fn constraint_clauses(config: &GenerationConfig) -> Vec<&'static str> {
    let mut clauses = Vec::new();

    match config.prompt_detail_level {
        DetailLevel::Low => {
            clauses.push("Keep the instructions minimal and rely on PowerShell defaults where possible.")
        }
        DetailLevel::Medium => {}
        DetailLevel::High => clauses.push(
            "Spell out every step explicitly and prefer self-describing cmdlet and parameter names.",
        ),
    }

    match config.verbosity {
        Verbosity::Terse => clauses.push("Keep the script terse; avoid decorative output."),
        Verbosity::Normal => {}
        Verbosity::Verbose => {
            clauses.push("Emit progress messages for each stage using Write-Verbose.")
        }
    }

    match config.script_type {
        ScriptType::Unattended => {}
        ScriptType::Interactive => clauses.push(
            "The script may prompt the operator for input where a decision is required.",
        ),
    }

    match config.security_level {
        SecurityLevel::Standard => {}
        SecurityLevel::Hardened => {
            clauses.push("Apply least-privilege and input validation practices throughout.")
        }
    }

    if config.include_header {
        clauses.push(
            "Begin the script with a comment-based help header describing purpose, parameters, and usage.",
        );
    }

    if config.include_error_handling {
        clauses.push("Wrap risky operations in try/catch with meaningful error messages.");
    }

    match config.logging_level {
        LoggingLevel::None => {}
        LoggingLevel::Basic => {
            clauses.push("Include basic progress logging at the start and end of the run.")
        }
        LoggingLevel::Detailed => clauses.push("Log each major step with timestamps."),
    }

    match config.file_encoding {
        FileEncoding::Utf8 => {}
        FileEncoding::Ascii => clauses.push("Restrict the script to ASCII characters only."),
    }

    clauses
}
