//! Prompt text and answer parsing for related-word queries.

use wordwalk_types::{RELATED_WORDS_PER_QUERY, Word};

pub(crate) const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates related words. \
Respond with exactly 10 words separated by commas, nothing else.";

pub(crate) fn user_prompt(word: &Word) -> String {
    format!(
        "Give me {RELATED_WORDS_PER_QUERY} words that are related to or associated with '{word}'. \
         Only return the words separated by commas, no other text."
    )
}

/// Extracts candidate words from a model answer.
///
/// Splits on commas and newlines, trims each segment, drops segments that are
/// not a single alphabetic word and drops repeats (ignoring case). At most
/// [`RELATED_WORDS_PER_QUERY`] words are returned, in answer order.
#[must_use]
pub fn parse_related_words(text: &str) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::with_capacity(RELATED_WORDS_PER_QUERY);
    for segment in text.split([',', '\n']) {
        let Ok(word) = Word::parse(segment.trim()) else {
            continue;
        };
        if !words.contains(&word) {
            words.push(word);
        }
        if words.len() == RELATED_WORDS_PER_QUERY {
            break;
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(words: &[Word]) -> Vec<&str> {
        words.iter().map(Word::as_str).collect()
    }

    #[test]
    fn splits_commas_and_newlines() {
        let words = parse_related_words("feline, kitten\nwhiskers,\r\npurr");
        assert_eq!(strs(&words), ["feline", "kitten", "whiskers", "purr"]);
    }

    #[test]
    fn drops_phrases_punctuation_and_empty_segments() {
        let words = parse_related_words("house cat, meow!, , tabby, 9lives,  claws ");
        assert_eq!(strs(&words), ["tabby", "claws"]);
    }

    #[test]
    fn keeps_at_most_ten() {
        let text = "a,b,c,d,e,f,g,h,i,j,k,l";
        let words = parse_related_words(text);
        assert_eq!(words.len(), RELATED_WORDS_PER_QUERY);
        assert_eq!(words.last().unwrap().as_str(), "j");
    }

    #[test]
    fn invalid_segments_do_not_count_toward_limit() {
        let text = "one two, a,b,c,d,e,f,g,h,i,j";
        let words = parse_related_words(text);
        assert_eq!(words.len(), 10);
        assert_eq!(words[0].as_str(), "a");
    }

    #[test]
    fn repeated_words_are_kept_once() {
        let words = parse_related_words("Puppy, puppy, PUPPY, canine");
        assert_eq!(strs(&words), ["Puppy", "canine"]);
    }

    #[test]
    fn empty_answer_yields_nothing() {
        assert!(parse_related_words("").is_empty());
        assert!(parse_related_words(" \n , ").is_empty());
    }

    #[test]
    fn user_prompt_names_the_word() {
        let prompt = user_prompt(&Word::parse("ocean").unwrap());
        assert!(prompt.contains("'ocean'"));
        assert!(prompt.contains("10 words"));
    }
}
