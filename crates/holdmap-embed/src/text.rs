//! Tokenization for the text-based methods.
//!
//! Two tiers: [`StopwordTokenizer`] is the primary strategy and
//! [`SimpleTokenizer`] the declared fallback. [`TieredTokenizer`] picks the
//! first tier whose `available()` is true.
//!
//! The built-in primary is unavailable only if its pattern fails to compile.
//! Vectorizers accept other tiers through `with_tokenizer`, and an injected
//! primary that reports unavailable falls through to the fallback.

use std::collections::HashSet;

use holdmap_core::ProductRecord;
use once_cell::sync::Lazy;
use regex::Regex;

/// Word pattern for frequency-text terms: two or more word characters.
static TERM_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b\w\w+\b").ok());

/// Anything that is not an ASCII letter or whitespace.
static NON_ALPHA: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^a-z\s]").ok());

/// English stop-words.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
        "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
        "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
        "beside", "besides", "between", "beyond", "both", "bottom", "but", "by", "can",
        "cannot", "could", "do", "does", "done", "down", "due", "during", "each", "eg",
        "eight", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
        "everyone", "everything", "everywhere", "except", "few", "first", "for", "former",
        "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
        "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
        "however", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just",
        "last", "latter", "least", "less", "many", "may", "me", "meanwhile", "might", "mine",
        "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "neither",
        "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing",
        "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
        "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "per", "perhaps", "rather", "same", "seem", "seemed", "seeming", "seems", "several",
        "she", "should", "since", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "than", "that", "the",
        "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
        "therefore", "therein", "these", "they", "this", "those", "though", "through",
        "throughout", "thus", "to", "together", "too", "toward", "towards", "under",
        "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
        "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "who",
        "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Minimum token length kept by both tiers.
pub const MIN_TOKEN_LEN: usize = 2;

/// A strategy for splitting product text into tokens.
pub trait Tokenize: Send + Sync {
    /// Short name, recorded in batch metadata.
    fn name(&self) -> &'static str;

    /// Returns true if this strategy can run in the current build.
    fn available(&self) -> bool;

    /// Splits `text` into tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Lowercases, replaces non-letters with spaces and drops stop-words.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopwordTokenizer;

impl Tokenize for StopwordTokenizer {
    fn name(&self) -> &'static str {
        "stopword"
    }

    /// True once the non-letter pattern has compiled.
    fn available(&self) -> bool {
        NON_ALPHA.is_some()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let Some(pattern) = NON_ALPHA.as_ref() else {
            return Vec::new();
        };
        pattern
            .replace_all(&lower, " ")
            .split_whitespace()
            .filter(|t| t.len() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(t))
            .map(str::to_string)
            .collect()
    }
}

/// Lowercases and splits on whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl Tokenize for SimpleTokenizer {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn available(&self) -> bool {
        true
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
            .map(str::to_string)
            .collect()
    }
}

/// Primary tokenizer with a declared fallback.
pub struct TieredTokenizer {
    primary: Box<dyn Tokenize>,
    fallback: Box<dyn Tokenize>,
}

impl Default for TieredTokenizer {
    fn default() -> Self {
        Self::new(Box::new(StopwordTokenizer), Box::new(SimpleTokenizer))
    }
}

impl std::fmt::Debug for TieredTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredTokenizer")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl TieredTokenizer {
    /// Creates a tokenizer from two tiers.
    #[must_use]
    pub fn new(primary: Box<dyn Tokenize>, fallback: Box<dyn Tokenize>) -> Self {
        Self { primary, fallback }
    }

    /// The tier that will actually run.
    #[must_use]
    pub fn active(&self) -> &dyn Tokenize {
        if self.primary.available() {
            self.primary.as_ref()
        } else {
            self.fallback.as_ref()
        }
    }

    /// Tokenizes with the active tier.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.active().tokenize(text)
    }

    /// Token document for a product: its text features plus product type.
    #[must_use]
    pub fn product_tokens(&self, product: &ProductRecord) -> Vec<String> {
        let mut parts = product.text_features();
        if !product.product_type.trim().is_empty() {
            parts.push(product.product_type.as_str());
        }
        self.tokenize(&parts.join(" "))
    }
}

/// Lowercased document for frequency-text weighting.
#[must_use]
pub fn product_document(product: &ProductRecord) -> String {
    product.text_features().join(" ").to_lowercase().trim().to_string()
}

/// Frequency-text terms: `\b\w\w+\b` matches minus stop-words, followed by
/// adjacent-pair bigrams over the surviving unigrams.
#[must_use]
pub fn unigrams_and_bigrams(document: &str) -> Vec<String> {
    let Some(pattern) = TERM_PATTERN.as_ref() else {
        return Vec::new();
    };
    let unigrams: Vec<&str> = pattern
        .find_iter(document)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    let mut terms: Vec<String> = unigrams.iter().map(|t| (*t).to_string()).collect();
    terms.extend(unigrams.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Disabled;

    impl Tokenize for Disabled {
        fn name(&self) -> &'static str {
            "disabled"
        }
        fn available(&self) -> bool {
            false
        }
        fn tokenize(&self, _text: &str) -> Vec<String> {
            vec!["never".to_string()]
        }
    }

    #[test]
    fn test_stopword_tokenizer() {
        let tokens = StopwordTokenizer.tokenize("The Vanguard 500 Index Fund, Class-A");
        assert_eq!(tokens, vec!["vanguard", "index", "fund", "class"]);
    }

    #[test]
    fn test_simple_tokenizer_keeps_stopwords() {
        let tokens = SimpleTokenizer.tokenize("The S&P 500 a");
        assert_eq!(tokens, vec!["the", "s&p", "500"]);
    }

    #[test]
    fn test_tiered_falls_back_when_unavailable() {
        let tiered = TieredTokenizer::new(Box::new(Disabled), Box::new(SimpleTokenizer));
        assert_eq!(tiered.active().name(), "simple");
        assert_eq!(tiered.tokenize("Apple Inc"), vec!["apple", "inc"]);

        assert_eq!(TieredTokenizer::default().active().name(), "stopword");
    }

    #[test]
    fn test_product_tokens_include_type() {
        let p = ProductRecord::builder(1, "Apple Inc")
            .sector("Technology")
            .product_type("Stock")
            .build();
        let tokens = TieredTokenizer::default().product_tokens(&p);
        assert_eq!(tokens, vec!["apple", "inc", "technology", "stock"]);
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let terms = unigrams_and_bigrams("apple inc of technology");
        assert_eq!(
            terms,
            vec!["apple", "inc", "technology", "apple inc", "inc technology"]
        );
        assert!(unigrams_and_bigrams("a").is_empty());
    }
}
