use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::PathBuf;

use psforge::error::EnvVarError;
use psforge::{
    compile, ClientConfig, GenError, GenerateRequest, GenerationConfig, ModelClient, ScriptFile,
};

const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    psforge::init_logging();

    let matches = Command::new("psforge")
        .version("0.1.0")
        .about("Generate PowerShell scripts from a structured configuration")
        .arg(
            Arg::new("config-file")
                .long("config-file")
                .value_name("FILE")
                .help("JSON file containing the generation configuration")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .help("Directory the .ps1 file is written to (default: current directory)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("print-prompt")
                .long("print-prompt")
                .help("Compile and print the instruction prompt without calling the model")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_file: &String = matches.get_one("config-file").expect("required");
    let config: GenerationConfig = serde_json::from_str(&fs::read_to_string(config_file)?)?;

    let prompt = compile(&config)?;

    if matches.get_flag("print-prompt") {
        println!("{}", prompt);
        return Ok(());
    }

    let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
        GenError::EnvVar(EnvVarError {
            var: API_KEY_VAR.to_string(),
            instructions: Some(
                "Create an API key in Google AI Studio and export it before running".to_string(),
            ),
        })
    })?;

    let client = ModelClient::new(&ClientConfig {
        api_key: Some(api_key),
        api_base: None,
        timeout_secs: None,
    })?;

    let request = GenerateRequest::from_config(&config, prompt);
    let response_text = client.generate_text(&request).await?;

    let script = ScriptFile::build(&config, &response_text);
    let out_dir: PathBuf = matches
        .get_one::<String>("out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = script.save(&out_dir)?;

    println!("{}", script.code);
    eprintln!("wrote {}", path.display());

    Ok(())
}
