use std::path::PathBuf;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use tracing::info;

mod api;
mod cli;
mod config;
mod prompt;
mod references;
mod strategy;
mod styles;
mod utils;

use api::{GenerateOptions, JimengClient};
use cli::SelfieAppCli;
use config::Config;
use prompt::build_full_prompt;
use strategy::SelfieStrategy;
use styles::{ShotMode, StyleCatalog, DEFAULT_PLATFORM};
use utils::logging::init_logging;

struct CliArgs {
    prompt: Option<String>,
    selfie: bool,
    style: Option<String>,
    platform: String,
    list_styles: bool,
    output: Option<PathBuf>,
}

fn usage() -> &'static str {
    "Usage: jimeng_selfie [--prompt|-p <text>] [--selfie|-s] [--style <name>] [--platform private|x|xiaohongshu] [--list-styles] [--output|-o <dir>]"
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        prompt: None,
        selfie: false,
        style: None,
        platform: DEFAULT_PLATFORM.to_string(),
        list_styles: false,
        output: None,
    };

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--prompt" | "-p" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --prompt"))?;
                parsed.prompt = Some(value.clone());
            }
            "--selfie" | "-s" => {
                parsed.selfie = true;
            }
            "--style" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --style"))?;
                parsed.style = Some(value.clone());
            }
            "--platform" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --platform"))?;
                match value.as_str() {
                    "private" | "x" | "xiaohongshu" => parsed.platform = value.clone(),
                    other => return Err(anyhow!("Invalid --platform value: {other}")),
                }
            }
            "--list-styles" => {
                parsed.list_styles = true;
            }
            "--output" | "-o" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --output"))?;
                parsed.output = Some(PathBuf::from(value));
            }
            other => return Err(anyhow!("Unknown argument: {other}")),
        }
        index += 1;
    }

    Ok(parsed)
}

fn print_style_lists() {
    let catalog = StyleCatalog::default();
    println!("自拍风格:");
    for style in catalog.pool(ShotMode::Selfie) {
        println!("  - {style}");
    }
    println!("\n他拍风格:");
    for style in catalog.pool(ShotMode::Portrait) {
        println!("  - {style}");
    }
}

async fn run_direct(config: &Config, args: &CliArgs, prompt_text: &str) {
    let mut client = JimengClient::new(config);
    if let Some(output) = &args.output {
        client.set_output_dir(output.clone());
    }

    let final_prompt = if args.selfie {
        let mut strategy = SelfieStrategy::default();
        let style = match &args.style {
            Some(style) => style.clone(),
            None => strategy.select_style(&args.platform, None, true),
        };
        println!("使用风格: {style}");
        build_full_prompt(strategy.catalog(), prompt_text, &style, ShotMode::Selfie, "")
    } else {
        prompt_text.to_string()
    };

    println!("提示词: {final_prompt}");
    println!("正在生成...");

    let options = GenerateOptions {
        filename_prefix: "cli_gen".to_string(),
        ..GenerateOptions::default()
    };
    let result = client.generate(&final_prompt, &options).await;

    if result.is_success() {
        let location = result
            .local_path()
            .map(|path| path.display().to_string())
            .or_else(|| result.url().map(str::to_string))
            .unwrap_or_default();
        println!("[+] 成功: {location}");
    } else {
        let error = result
            .error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "未知错误".to_string());
        println!("[-] 失败: {error}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::load();
    let _guards = init_logging(&config.log_level);

    let args: Vec<String> = std::env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    if parsed.list_styles {
        print_style_lists();
        return Ok(());
    }

    if let Some(prompt_text) = parsed.prompt.clone() {
        info!("Starting jimeng_selfie in direct mode");
        run_direct(&config, &parsed, &prompt_text).await;
        return Ok(());
    }

    info!("Starting jimeng_selfie in interactive mode");
    let mut app = SelfieAppCli::new(&config);
    app.run_interactive().await;

    Ok(())
}
