//! Greeting / courtesy detection. A cheap heuristic: longer casual phrasing is a miss.

pub const GREETING_REPLY: &str = "¡Hola! 😊 Estoy aquí para ayudarte con todo lo relacionado a nuestros servicios. ¿En qué puedo asistirte hoy?";
pub const THANKS_REPLY: &str =
    "¡Con gusto! Si necesitas algo más sobre nuestros servicios, dime 😊";

const PHRASES: &[&str] = &[
    "hola",
    "hola!",
    "hola.",
    "buenas",
    "buenas!",
    "buenas tardes",
    "buenas noches",
    "buenos días",
    "buenos dias",
    "hey",
    "que tal",
    "qué tal",
    "gracias",
    "muchas gracias",
    "ok",
    "vale",
    "entendido",
    "perfecto",
    "hola chatbot",
    "hola bot",
];

const PREFIXES: &[&str] = &["hola", "buen", "grac", "hey", "que tal", "qué tal"];

/// Prefix matches only count for inputs up to this many characters.
const MAX_PREFIX_LEN: usize = 20;

pub fn is_small_talk(question: &str) -> bool {
    let normalized = question.trim().to_lowercase();
    if PHRASES.contains(&normalized.as_str()) {
        return true;
    }
    normalized.chars().count() <= MAX_PREFIX_LEN
        && PREFIXES.iter().any(|p| normalized.starts_with(p))
}

/// Canned reply: thanks get a thanks-specific answer, everything else the greeting.
pub fn small_talk_reply(question: &str) -> &'static str {
    if question.to_lowercase().contains("grac") {
        THANKS_REPLY
    } else {
        GREETING_REPLY
    }
}
