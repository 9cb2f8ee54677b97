//! Localized user-facing text.
//!
//! Every string shown to the user is built here, so callers never branch
//! on the language themselves.

use erenai_types::{Locale, UserSettings};

/// A user-facing message together with its parameters.
#[derive(Debug, Clone, Copy)]
pub enum Message<'a> {
    Greeting,
    Farewell,
    SetupComplete,
    SuggestedCommands,
    Thinking,
    ExecutingCommand(&'a str),
    CommandFailed(&'a str),
    CommandLaunchFailed(&'a str),
    LanguageSet(Locale),
    ContextLengthSet(u32),
    CommandSuggestionsSet(bool),
    SettingsReport(&'a UserSettings),
    /// System prompt sent to the remote model.
    SystemPrompt,
    MissingApiKey,
    ApiError(&'a str),
    DecodeError(&'a str),
}

/// Render `message` in `locale`.
pub fn localize(message: Message<'_>, locale: Locale) -> String {
    use Message::*;

    match (message, locale) {
        (Greeting, Locale::Tr) => {
            "ErenAI: Merhaba! Size nasıl yardımcı olabilirim? (Çıkmak için 'exit' veya 'quit' yazın)"
                .to_string()
        }
        (Greeting, Locale::En) => {
            "ErenAI: Hello! How can I help you? (Type 'exit' or 'quit' to exit)".to_string()
        }
        (Farewell, Locale::Tr) => "ErenAI: Görüşmek üzere!".to_string(),
        (Farewell, Locale::En) => "ErenAI: See you later!".to_string(),
        (SetupComplete, Locale::Tr) => "ErenAI kurulumu tamamlandı.".to_string(),
        (SetupComplete, Locale::En) => "ErenAI setup complete.".to_string(),
        (SuggestedCommands, Locale::Tr) => "Önerilen komutlar:".to_string(),
        (SuggestedCommands, Locale::En) => "Suggested commands:".to_string(),
        (Thinking, Locale::Tr) => "ErenAI düşünüyor...".to_string(),
        (Thinking, Locale::En) => "ErenAI thinking...".to_string(),
        (ExecutingCommand(cmd), Locale::Tr) => format!("Komut çalıştırılıyor: {cmd}"),
        (ExecutingCommand(cmd), Locale::En) => format!("Executing command: {cmd}"),
        (CommandFailed(stderr), Locale::Tr) => format!("Hata: {stderr}"),
        (CommandFailed(stderr), Locale::En) => format!("Error: {stderr}"),
        (CommandLaunchFailed(error), Locale::Tr) => format!("Komut çalıştırma hatası: {error}"),
        (CommandLaunchFailed(error), Locale::En) => format!("Could not run command: {error}"),
        (LanguageSet(lang), Locale::Tr) => {
            format!("Dil {} olarak ayarlandı.", language_name(lang, Locale::Tr))
        }
        (LanguageSet(lang), Locale::En) => {
            format!("Language set to {}.", language_name(lang, Locale::En))
        }
        (ContextLengthSet(n), Locale::Tr) => format!("Bağlam uzunluğu {n} olarak ayarlandı."),
        (ContextLengthSet(n), Locale::En) => format!("Context length set to {n}."),
        (CommandSuggestionsSet(on), Locale::Tr) => {
            format!("Komut önerileri {}.", if on { "açık" } else { "kapalı" })
        }
        (CommandSuggestionsSet(on), Locale::En) => {
            format!("Command suggestions {}.", if on { "enabled" } else { "disabled" })
        }
        (SettingsReport(s), Locale::Tr) => format!(
            "Mevcut ayarlar:\n- Dil: {}\n- Bağlam uzunluğu: {}\n- Komut önerileri: {}",
            language_name(s.language, Locale::Tr),
            s.context_length,
            if s.command_suggestions { "Açık" } else { "Kapalı" }
        ),
        (SettingsReport(s), Locale::En) => format!(
            "Current settings:\n- Language: {}\n- Context length: {}\n- Command suggestions: {}",
            language_name(s.language, Locale::En),
            s.context_length,
            if s.command_suggestions { "Enabled" } else { "Disabled" }
        ),
        (SystemPrompt, Locale::Tr) => "Sen kullanıcıya Türkçe yanıt veren ve onların SSH \
             komutlarını çalıştırmalarına yardımcı olan bir asistansın."
            .to_string(),
        (SystemPrompt, Locale::En) => {
            "You are an assistant that responds in English and helps users run SSH commands."
                .to_string()
        }
        (MissingApiKey, Locale::Tr) => "HATA: OpenAI API anahtarı bulunamadı. Lütfen \
             OPENAI_API_KEY ortam değişkenini ayarlayın."
            .to_string(),
        (MissingApiKey, Locale::En) => "ERROR: OpenAI API key not found. Please set the \
             OPENAI_API_KEY environment variable."
            .to_string(),
        (ApiError(detail), Locale::Tr) => format!("API hatası: {detail}"),
        (ApiError(detail), Locale::En) => format!("API error: {detail}"),
        (DecodeError(detail), Locale::Tr) => format!("Yanıt çözme hatası: {detail}"),
        (DecodeError(detail), Locale::En) => format!("Response decoding error: {detail}"),
    }
}

/// Name of `lang` written in `locale`.
fn language_name(lang: Locale, locale: Locale) -> &'static str {
    match (lang, locale) {
        (Locale::Tr, Locale::Tr) => "Türkçe",
        (Locale::En, Locale::Tr) => "İngilizce",
        (Locale::Tr, Locale::En) => "Turkish",
        (Locale::En, Locale::En) => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_confirmation() {
        assert_eq!(
            localize(Message::LanguageSet(Locale::Tr), Locale::Tr),
            "Dil Türkçe olarak ayarlandı."
        );
        assert_eq!(
            localize(Message::LanguageSet(Locale::En), Locale::En),
            "Language set to English."
        );
    }

    #[test]
    fn test_settings_report() {
        let settings = UserSettings {
            language: Locale::En,
            context_length: 3,
            command_suggestions: false,
        };
        assert_eq!(
            localize(Message::SettingsReport(&settings), Locale::En),
            "Current settings:\n- Language: English\n- Context length: 3\n- Command suggestions: Disabled"
        );
        assert!(localize(Message::SettingsReport(&settings), Locale::Tr)
            .starts_with("Mevcut ayarlar:\n- Dil: İngilizce"));
    }

    #[test]
    fn test_system_prompt_differs_by_locale() {
        assert_ne!(
            localize(Message::SystemPrompt, Locale::Tr),
            localize(Message::SystemPrompt, Locale::En)
        );
    }
}
