//! Prompt Templates
//!
//! Static instructions sent with every completion request. The schema and
//! normalization rules here are what the extractor and sanitizer expect back.

use crate::ai::provider::ChatMessage;

/// System instructions for venue request parsing
pub const VENUE_INTENT_PROMPT: &str = r#"Ты — модуль семантического разбора запросов о местах.

Преобразуй запрос пользователя в JSON по этой схеме:
{
  "intent": ["типы_мест"],
  "categories": ["категории"],
  "radius": число,
  "mood": "настроение",
  "company": "с_кем",
  "time_context": "когда",
  "price_level": "none/low/medium/high/premium",
  "feature_tags": ["теги"]
}

Правила:
- radius: "рядом/недалеко" = 2000, иначе 5000
- price_level: только low, medium, high, premium, так же если нет никакой информации о цене поставить none
- Все остальные поля могут быть любыми словами
- Верни ТОЛЬКО JSON, без пояснений

Пример:
Запрос: "Хочу в тихий бар с друзьями"
Ответ: {"intent":["бар"],"categories":[],"radius":5000,"mood":"спокойное","company":"друзья","time_context":"вечер","price_level":"medium","feature_tags":["пиво"]}
"#;

/// Prompt template access
pub struct PromptTemplates;

impl PromptTemplates {
    /// The two-message exchange for one user query: instructions, then the text
    pub fn venue_intent(text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(VENUE_INTENT_PROMPT),
            ChatMessage::user(text),
        ]
    }
}
