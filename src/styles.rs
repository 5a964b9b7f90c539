use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMode {
    Selfie,
    Portrait,
}

const SELFIE_STYLES: [&str; 20] = [
    "镜面自拍",
    "举高自拍",
    "侧脸自拍",
    "遮脸自拍",
    "背影自拍",
    "对镜微笑",
    "低头自拍",
    "仰望自拍",
    "闭眼自拍",
    "撩发自拍",
    "托腮自拍",
    "比心自拍",
    "比V自拍",
    "捧脸自拍",
    "戴墨镜自拍",
    "戴帽子自拍",
    "户外自拍",
    "咖啡厅自拍",
    "海边自拍",
    "日落自拍",
];

const PORTRAIT_STYLES: [&str; 8] = [
    "专业人像",
    "街拍风格",
    "自然抓拍",
    "艺术写真",
    "旅行照",
    "运动风格",
    "休闲风格",
    "商务风格",
];

const SELFIE_ENHANCEMENTS: [(&str, &str); 20] = [
    ("镜面自拍", "对着浴室镜子自拍，镜面反射效果"),
    ("举高自拍", "手机举高向下俯拍角度，显瘦效果"),
    ("侧脸自拍", "45度侧脸角度，展现脸部轮廓"),
    ("遮脸自拍", "用手或物品部分遮挡脸部，神秘感"),
    ("背影自拍", "背对镜头回眸，优雅的背影"),
    ("对镜微笑", "对着镜子自然微笑，眼神明亮"),
    ("低头自拍", "微微低头，温柔的眼神"),
    ("仰望自拍", "抬头仰望，展现颈部线条"),
    ("闭眼自拍", "闭眼微笑，享受当下的感觉"),
    ("撩发自拍", "单手撩动头发，自然动作"),
    ("托腮自拍", "手托下巴，可爱的姿势"),
    ("比心自拍", "双手比心，青春活力"),
    ("比V自拍", "剪刀手比V，经典姿势"),
    ("捧脸自拍", "双手捧脸，可爱表情"),
    ("戴墨镜自拍", "戴着时尚墨镜，酷飒风格"),
    ("戴帽子自拍", "戴着帽子，修饰脸型"),
    ("户外自拍", "户外自然光线下，背景虚化"),
    ("咖啡厅自拍", "咖啡厅内，温馨氛围"),
    ("海边自拍", "海边背景，海风吹拂头发"),
    ("日落自拍", "日落逆光，温暖色调"),
];

const PORTRAIT_ENHANCEMENTS: [(&str, &str); 8] = [
    ("专业人像", "专业影棚拍摄，柔和的打光，清晰的面部细节"),
    ("街拍风格", "街头自然抓拍，动态姿势，城市背景"),
    ("自然抓拍", "不经意的自然瞬间，真实表情"),
    ("艺术写真", "艺术感的构图，独特的光影效果"),
    ("旅行照", "旅行场景中的自然照片，地标背景"),
    ("运动风格", "运动场景中，活力四射"),
    ("休闲风格", "休闲日常场景，轻松自在"),
    ("商务风格", "正式商务场景，专业形象"),
];

#[derive(Debug, Clone)]
pub struct StyleCatalog {
    selfie_styles: Vec<&'static str>,
    portrait_styles: Vec<&'static str>,
    selfie_enhancements: HashMap<&'static str, &'static str>,
    portrait_enhancements: HashMap<&'static str, &'static str>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self {
            selfie_styles: SELFIE_STYLES.to_vec(),
            portrait_styles: PORTRAIT_STYLES.to_vec(),
            selfie_enhancements: SELFIE_ENHANCEMENTS.into_iter().collect(),
            portrait_enhancements: PORTRAIT_ENHANCEMENTS.into_iter().collect(),
        }
    }
}

impl StyleCatalog {
    pub fn pool(&self, mode: ShotMode) -> &[&'static str] {
        match mode {
            ShotMode::Selfie => &self.selfie_styles,
            ShotMode::Portrait => &self.portrait_styles,
        }
    }

    // Unknown styles pass through unchanged: no enhancement is not an error.
    pub fn enhancement_for<'a>(&'a self, style: &'a str, mode: ShotMode) -> &'a str {
        let table = match mode {
            ShotMode::Selfie => &self.selfie_enhancements,
            ShotMode::Portrait => &self.portrait_enhancements,
        };
        table.get(style).copied().unwrap_or(style)
    }
}

pub const DEFAULT_PLATFORM: &str = "private";

#[derive(Debug, Clone)]
pub struct PlatformPolicy {
    selfie_ratios: HashMap<&'static str, f64>,
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        let mut selfie_ratios = HashMap::new();
        selfie_ratios.insert("x", 0.7);
        selfie_ratios.insert("xiaohongshu", 0.7);
        selfie_ratios.insert(DEFAULT_PLATFORM, 1.0);
        Self { selfie_ratios }
    }
}

impl PlatformPolicy {
    pub fn selfie_ratio(&self, platform: &str) -> f64 {
        self.selfie_ratios
            .get(platform)
            .or_else(|| self.selfie_ratios.get(DEFAULT_PLATFORM))
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_uses_private_ratio() {
        let policy = PlatformPolicy::default();
        assert_eq!(policy.selfie_ratio("mastodon"), 1.0);
        assert_eq!(policy.selfie_ratio("x"), 0.7);
    }

    #[test]
    fn enhancement_lookup_hits_known_styles() {
        let catalog = StyleCatalog::default();
        let text = catalog.enhancement_for("镜面自拍", ShotMode::Selfie);
        assert_eq!(text, "对着浴室镜子自拍，镜面反射效果");
    }

    #[test]
    fn unknown_style_passes_through_unchanged_twice() {
        let catalog = StyleCatalog::default();
        let first = catalog.enhancement_for("赛博朋克自拍", ShotMode::Selfie);
        let second = catalog.enhancement_for("赛博朋克自拍", ShotMode::Selfie);
        assert_eq!(first, "赛博朋克自拍");
        assert_eq!(first, second);
    }

    #[test]
    fn pools_are_disjoint_catalogs() {
        let catalog = StyleCatalog::default();
        assert_eq!(catalog.pool(ShotMode::Selfie).len(), 20);
        assert_eq!(catalog.pool(ShotMode::Portrait).len(), 8);
        for style in catalog.pool(ShotMode::Selfie) {
            assert!(!catalog.pool(ShotMode::Portrait).contains(style));
        }
    }
}
