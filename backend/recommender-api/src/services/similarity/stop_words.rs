use std::collections::HashSet;

use serde::Deserialize;

/// Stop-word list applied by the TF-IDF tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    #[default]
    Russian,
    English,
    #[serde(rename = "none")]
    Disabled,
}

impl StopWords {
    pub fn words(&self) -> HashSet<&'static str> {
        match self {
            StopWords::Russian => RUSSIAN.iter().copied().collect(),
            StopWords::English => ENGLISH.iter().copied().collect(),
            StopWords::Disabled => HashSet::new(),
        }
    }
}

const RUSSIAN: &[&str] = &[
    "а", "без", "более", "бы", "был", "была", "были", "было", "быть", "в", "вам", "вас", "весь",
    "во", "вот", "все", "всего", "всех", "вы", "где", "да", "даже", "для", "до", "его", "ее",
    "её", "если", "есть", "еще", "ещё", "же", "за", "здесь", "и", "из", "или", "им", "их", "к",
    "как", "какой", "когда", "кто", "ли", "либо", "между", "меня", "мне", "может", "мы", "на",
    "над", "надо", "наш", "не", "него", "нее", "нет", "ни", "них", "но", "ну", "о", "об", "он",
    "она", "они", "оно", "от", "очень", "по", "под", "после", "при", "про", "с", "со", "так",
    "также", "такой", "там", "те", "тем", "то", "того", "тоже", "той", "только", "том", "ты",
    "у", "уже", "хотя", "чем", "через", "что", "чтобы", "чье", "эта", "эти", "это", "этот", "я",
];

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "else", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "if", "in", "into", "is", "it",
    "its", "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no",
    "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "upon", "us", "very", "was",
    "we", "were", "what", "when", "where", "whether", "which", "while", "who", "whom", "why",
    "will", "with", "within", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_selected_by_language() {
        assert!(StopWords::Russian.words().contains("для"));
        assert!(!StopWords::Russian.words().contains("the"));
        assert!(StopWords::English.words().contains("the"));
        assert!(StopWords::Disabled.words().is_empty());
    }

    #[test]
    fn deserializes_from_lowercase_name() {
        let value: StopWords = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(value, StopWords::English);
        let value: StopWords = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(value, StopWords::Disabled);
    }
}
