use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::api::{GenerateOptions, GenerationResult, JimengClient};
use crate::config::Config;
use crate::prompt::build_full_prompt;
use crate::references::ReferenceImageManager;
use crate::strategy::SelfieStrategy;
use crate::styles::{ShotMode, DEFAULT_PLATFORM};

pub struct SelfieAppCli {
    client: JimengClient,
    strategy: SelfieStrategy,
    references: ReferenceImageManager,
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

fn display_result(result: &GenerationResult) {
    println!("\n{}", "-".repeat(40));
    if result.is_success() {
        println!("[+] 生成成功!");
        println!("    提示词: {}", result.prompt);
        println!("    图片 URL: {}", result.url().unwrap_or_default());
        if let Some(path) = result.local_path() {
            println!("    本地路径: {}", path.display());
        }
        if let Some(seed) = result.seed() {
            println!("    随机种子: {seed}");
        }
    } else {
        let error = result
            .error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "未知错误".to_string());
        println!("[-] 生成失败: {error}");
    }
    println!("{}", "-".repeat(40));
}

impl SelfieAppCli {
    pub fn new(config: &Config) -> Self {
        Self {
            client: JimengClient::new(config),
            strategy: SelfieStrategy::default(),
            references: ReferenceImageManager::new(config.reference_dir.clone()),
        }
    }

    pub async fn run_interactive(&mut self) {
        println!("{}", "=".repeat(60));
        println!("  即梦自拍图片生成器");
        println!("  基于 Seedream 4.0 API");
        println!("{}", "=".repeat(60));
        println!();

        if !self.client.has_api_key() {
            println!("[!] 警告: 未配置 ARK_API_KEY 环境变量");
            println!("    请设置: export ARK_API_KEY='your-api-key'");
            println!();
            return;
        }

        loop {
            println!("\n请选择操作:");
            println!("  1. 生成自拍图片");
            println!("  2. 生成他拍图片");
            println!("  3. 自定义生成（输入完整提示词）");
            println!("  4. 查看自拍风格列表");
            println!("  5. 查看他拍风格列表");
            println!("  6. 管理参考图");
            println!("  0. 退出");
            println!();

            let Some(choice) = read_line("请输入选项 [0-6]: ") else {
                println!("\n再见!");
                break;
            };

            match choice.as_str() {
                "0" => {
                    println!("再见!");
                    break;
                }
                "1" => self.generate_selfie_interactive().await,
                "2" => self.generate_portrait_interactive().await,
                "3" => self.generate_custom().await,
                "4" => self.list_styles(ShotMode::Selfie),
                "5" => self.list_styles(ShotMode::Portrait),
                "6" => self.manage_references(),
                _ => println!("[!] 无效选项，请重新输入"),
            }
        }
    }

    fn choose_style(&self, mode: ShotMode) -> Option<String> {
        let pool = self.strategy.catalog().pool(mode);
        for (index, style) in pool.iter().enumerate() {
            println!("  {}. {style}", index + 1);
        }
        println!("  0. 随机选择");

        let choice = read_line(&format!("请选择风格 [0-{}]: ", pool.len()))?;
        if choice.is_empty() || choice == "0" {
            return None;
        }
        match choice.parse::<usize>() {
            Ok(index) if (1..=pool.len()).contains(&index) => Some(pool[index - 1].to_string()),
            _ => {
                println!("[!] 无效选择，使用随机风格");
                None
            }
        }
    }

    fn choose_platform() -> String {
        println!("\n目标平台:");
        println!("  1. 私聊 (100% 自拍)");
        println!("  2. X/Twitter (70% 自拍)");
        println!("  3. 小红书 (70% 自拍)");
        let choice = read_line("请选择 [1-3, 默认1]: ").unwrap_or_default();
        match choice.as_str() {
            "2" => "x".to_string(),
            "3" => "xiaohongshu".to_string(),
            _ => DEFAULT_PLATFORM.to_string(),
        }
    }

    async fn generate_selfie_interactive(&mut self) {
        println!("\n--- 生成自拍 ---");

        let Some(character) = read_line("请输入角色描述 (如: 25岁女性，黑色长发，白色连衣裙): ")
        else {
            return;
        };
        if character.is_empty() {
            println!("[!] 角色描述不能为空");
            return;
        }

        println!("\n可选自拍风格:");
        let style = self.choose_style(ShotMode::Selfie);
        let platform = Self::choose_platform();

        println!("\n正在生成图片...");
        let result = self
            .client
            .generate_selfie(
                &mut self.strategy,
                &character,
                style.as_deref(),
                Vec::new(),
                &platform,
            )
            .await;

        display_result(&result);
    }

    async fn generate_portrait_interactive(&mut self) {
        println!("\n--- 生成他拍 ---");

        let Some(character) = read_line("请输入角色描述: ") else {
            return;
        };
        if character.is_empty() {
            println!("[!] 角色描述不能为空");
            return;
        }

        println!("\n可选他拍风格:");
        let style = self
            .choose_style(ShotMode::Portrait)
            .unwrap_or_else(|| {
                self.strategy
                    .select_style(DEFAULT_PLATFORM, Some(ShotMode::Portrait), true)
            });

        let prompt = build_full_prompt(
            self.strategy.catalog(),
            &character,
            &style,
            ShotMode::Portrait,
            "",
        );

        println!("\n使用风格: {style}");
        println!("正在生成图片...");
        let options = GenerateOptions {
            filename_prefix: format!("other_{}", style.replace(' ', "_")),
            ..GenerateOptions::default()
        };
        let result = self.client.generate(&prompt, &options).await;

        display_result(&result);
    }

    async fn generate_custom(&mut self) {
        println!("\n--- 自定义生成 ---");

        let Some(prompt) = read_line("请输入完整提示词: ") else {
            return;
        };
        if prompt.is_empty() {
            println!("[!] 提示词不能为空");
            return;
        }

        println!("\n正在生成图片...");
        let options = GenerateOptions {
            filename_prefix: "custom".to_string(),
            ..GenerateOptions::default()
        };
        let result = self.client.generate(&prompt, &options).await;

        display_result(&result);
    }

    fn list_styles(&self, mode: ShotMode) {
        let title = match mode {
            ShotMode::Selfie => "自拍风格",
            ShotMode::Portrait => "他拍风格",
        };
        println!("\n--- {title}列表 ---");
        for (index, style) in self.strategy.catalog().pool(mode).iter().enumerate() {
            let enhancement = self.strategy.enhancement_for(style, mode);
            println!("  {}. {style}: {enhancement}", index + 1);
        }
    }

    fn manage_references(&self) {
        println!("\n--- 参考图管理 ---");

        let references = self.references.list_references();
        if references.is_empty() {
            println!("当前没有参考图");
        } else {
            println!("当前参考图 ({} 张):", references.len());
            for reference in &references {
                let name = reference
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| reference.display().to_string());
                println!("  - {name}");
            }
        }

        println!("\n操作:");
        println!("  1. 添加参考图");
        println!("  0. 返回");

        let Some(choice) = read_line("请选择: ") else {
            return;
        };
        if choice != "1" {
            return;
        }

        let Some(source) = read_line("请输入源图片路径: ") else {
            return;
        };
        match self.references.add_reference(Path::new(&source), None) {
            Ok(target) => println!("[+] 已添加: {}", target.display()),
            Err(err) => println!("[!] 添加失败: {err}"),
        }
    }
}
