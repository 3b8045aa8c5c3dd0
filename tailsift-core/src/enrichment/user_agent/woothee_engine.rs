use woothee::parser::Parser;

/// Wraps woothee as a second opinion for crawlers that carry none of the
/// generic bot tokens.
pub struct WootheeEngine {
    parser: Parser,
}

impl WootheeEngine {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub fn is_crawler(&self, ua: &str) -> bool {
        self.parser
            .parse(ua)
            .is_some_and(|result| result.category == "crawler")
    }
}

impl Default for WootheeEngine {
    fn default() -> Self {
        Self::new()
    }
}
