use crate::enrichment::user_agent::signatures::BotSignature;

/// (signature, display name, intent)
const DEFAULT_SIGNATURES: &[(&str, &str, &str)] = &[
    // Search engines
    ("googlebot-image", "Googlebot Image", "search"),
    ("googlebot-video", "Googlebot Video", "search"),
    ("googlebot-news", "Googlebot News", "search"),
    ("googlebot", "Googlebot", "search"),
    ("google-inspectiontool", "Google Inspection Tool", "search"),
    ("googleother", "GoogleOther", "search"),
    ("storebot-google", "Google StoreBot", "search"),
    ("bingbot", "Bingbot", "search"),
    ("bingpreview", "Bing Preview", "search"),
    ("msnbot", "MSNBot", "search"),
    ("slurp", "Yahoo! Slurp", "search"),
    ("duckduckbot", "DuckDuckBot", "search"),
    ("baiduspider", "Baiduspider", "search"),
    ("yandexbot", "YandexBot", "search"),
    ("yandeximages", "Yandex Images", "search"),
    ("applebot", "Applebot", "search"),
    ("petalbot", "PetalBot", "search"),
    ("sogou web spider", "Sogou Spider", "search"),
    ("seznambot", "SeznamBot", "search"),
    ("qwantify", "Qwantify", "search"),
    ("mojeekbot", "MojeekBot", "search"),
    // Advertising
    ("adsbot-google", "Google AdsBot", "ads"),
    ("mediapartners-google", "Google AdSense", "ads"),
    // AI crawlers and assistants
    ("gptbot", "GPTBot", "ai"),
    ("chatgpt-user", "ChatGPT User", "ai"),
    ("oai-searchbot", "OAI SearchBot", "ai"),
    ("claudebot", "ClaudeBot", "ai"),
    ("claude-web", "Claude Web", "ai"),
    ("anthropic-ai", "Anthropic AI", "ai"),
    ("perplexitybot", "PerplexityBot", "ai"),
    ("perplexity-user", "Perplexity User", "ai"),
    ("ccbot", "Common Crawl", "ai"),
    ("bytespider", "Bytespider", "ai"),
    ("amazonbot", "Amazonbot", "ai"),
    ("cohere-ai", "Cohere AI", "ai"),
    ("meta-externalagent", "Meta External Agent", "ai"),
    ("diffbot", "Diffbot", "ai"),
    ("youbot", "YouBot", "ai"),
    // SEO tools
    ("ahrefsbot", "AhrefsBot", "seo"),
    ("ahrefssiteaudit", "Ahrefs Site Audit", "seo"),
    ("semrushbot", "SemrushBot", "seo"),
    ("mj12bot", "MJ12bot", "seo"),
    ("dotbot", "DotBot", "seo"),
    ("rogerbot", "Rogerbot", "seo"),
    ("blexbot", "BLEXBot", "seo"),
    ("dataforseobot", "DataForSeoBot", "seo"),
    ("screaming frog seo spider", "Screaming Frog", "seo"),
    ("serpstatbot", "SerpstatBot", "seo"),
    // Social previews
    ("facebookexternalhit", "Facebook", "social"),
    ("facebookcatalog", "Facebook Catalog", "social"),
    ("twitterbot", "Twitterbot", "social"),
    ("linkedinbot", "LinkedInBot", "social"),
    ("slackbot-linkexpanding", "Slack Link Expander", "social"),
    ("slackbot", "Slackbot", "social"),
    ("discordbot", "Discordbot", "social"),
    ("telegrambot", "TelegramBot", "social"),
    ("pinterestbot", "Pinterestbot", "social"),
    ("redditbot", "Redditbot", "social"),
    ("mastodon", "Mastodon", "social"),
    // Monitoring
    ("uptimerobot", "UptimeRobot", "monitoring"),
    ("pingdom.com_bot", "Pingdom", "monitoring"),
    ("statuscake", "StatusCake", "monitoring"),
    ("site24x7", "Site24x7", "monitoring"),
    ("datadogsynthetics", "Datadog Synthetics", "monitoring"),
    ("better uptime bot", "Better Uptime", "monitoring"),
    // Archivers
    ("ia_archiver", "Internet Archive", "archiver"),
    ("archive.org_bot", "Internet Archive", "archiver"),
];

pub fn default_signatures() -> Vec<BotSignature> {
    DEFAULT_SIGNATURES
        .iter()
        .map(|(signature, name, intent)| BotSignature::new(signature, name, intent))
        .collect()
}
