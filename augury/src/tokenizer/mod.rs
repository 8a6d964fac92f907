//! Splitting text into sentences of words, and counting n-grams over them.

use std::mem;
use std::str::Chars;

use unic_ucd_category::GeneralCategory;

pub mod case_handling;
pub mod ngram;

pub trait Tokenize {
    /// Sentences of words, in text order.
    fn sentences(&self) -> Sentences;

    /// Words of the last, possibly unfinished, sentence. Ends with an empty
    /// word when the text ends in whitespace, and is a single empty word
    /// when the text is blank or ends a sentence.
    fn last_sentence(&self) -> Vec<String>;
}

impl Tokenize for str {
    fn sentences(&self) -> Sentences {
        Sentences::new(self)
    }

    fn last_sentence(&self) -> Vec<String> {
        let fallback = || vec![String::new()];

        let last = match self.chars().last() {
            Some(ch) if !self.trim().is_empty() => ch,
            _ => return fallback(),
        };

        if is_sentence_ender(last) {
            return fallback();
        }

        let reversed: String = self.chars().rev().collect();
        let mut words = match reversed.sentences().next() {
            Some(words) if !words.is_empty() => words,
            _ => return fallback(),
        };

        words.reverse();
        for word in words.iter_mut() {
            *word = word.chars().rev().collect();
        }

        if is_word_separator(last) {
            words.push(String::new());
        }

        words
    }
}

#[inline(always)]
pub(crate) fn is_word_char(ch: char) -> bool {
    let category = GeneralCategory::of(ch);
    category.is_letter() || category == GeneralCategory::DecimalNumber
}

#[inline(always)]
fn is_word_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

#[inline(always)]
fn is_sentence_ender(ch: char) -> bool {
    !(is_word_char(ch) || is_word_separator(ch))
}

#[inline(always)]
fn is_joiner(ch: char) -> bool {
    ch == '\'' || ch == '-'
}

enum Step {
    Skip,
    Add,
    EndWord,
    EndSentence,
}

/// Iterator over the sentences of a text.
///
/// Words are runs of letters and digits. Inside a word one apostrophe and
/// single hyphens are kept; a second apostrophe or a double hyphen ends the
/// sentence, and a hyphen after an apostrophe ends the word. Whitespace and
/// commas separate words, any other character ends the sentence. Trailing
/// apostrophes and hyphens are trimmed.
pub struct Sentences<'a> {
    chars: Chars<'a>,
    word: String,
    sentence: Vec<String>,
    in_word: bool,
    in_sentence: bool,
    apostrophe: bool,
    previous: char,
}

impl<'a> Sentences<'a> {
    fn new(text: &'a str) -> Sentences<'a> {
        Sentences {
            chars: text.chars(),
            word: String::new(),
            sentence: vec![],
            in_word: false,
            in_sentence: false,
            apostrophe: false,
            previous: ' ',
        }
    }

    fn step(&mut self, ch: char) -> Step {
        if !self.in_word {
            if is_word_char(ch) {
                self.in_word = true;
                self.in_sentence = true;
                return Step::Add;
            }

            if self.in_sentence && is_sentence_ender(ch) {
                return Step::EndSentence;
            }

            return Step::Skip;
        }

        match ch {
            '-' if self.previous == '-' => Step::EndSentence,
            '-' if self.apostrophe => Step::EndWord,
            '-' => Step::Add,
            '\'' if self.apostrophe => Step::EndSentence,
            '\'' => {
                self.apostrophe = true;
                Step::Add
            }
            ch if is_word_separator(ch) => Step::EndWord,
            ch if is_word_char(ch) => Step::Add,
            _ => Step::EndSentence,
        }
    }

    fn end_word(&mut self) {
        while self.word.ends_with(is_joiner) {
            self.word.pop();
        }

        if !self.word.is_empty() {
            self.sentence.push(mem::take(&mut self.word));
        }

        self.in_word = false;
        self.apostrophe = false;
    }

    fn end_sentence(&mut self) -> Vec<String> {
        self.end_word();
        self.in_sentence = false;
        mem::take(&mut self.sentence)
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Vec<String>> {
        while let Some(ch) = self.chars.next() {
            let step = self.step(ch);
            self.previous = ch;

            match step {
                Step::Skip => {}
                Step::Add => self.word.push(ch),
                Step::EndWord => self.end_word(),
                Step::EndSentence => {
                    let sentence = self.end_sentence();
                    if !sentence.is_empty() {
                        return Some(sentence);
                    }
                }
            }
        }

        let sentence = self.end_sentence();
        if sentence.is_empty() {
            None
        } else {
            Some(sentence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<Vec<String>> {
        text.sentences().collect()
    }

    #[test]
    fn splits_sentences() {
        assert_eq!(
            sentences("I love you. We live here!  And then, again"),
            vec![
                vec!["I", "love", "you"],
                vec!["We", "live", "here"],
                vec!["And", "then", "again"],
            ]
        );
    }

    #[test]
    fn apostrophes_and_hyphens() {
        assert_eq!(
            sentences("don't re-use rock'n'roll"),
            vec![vec!["don't", "re-use", "rock'n"], vec!["roll"]]
        );
        assert_eq!(
            sentences("well-- maybe"),
            vec![vec!["well"], vec!["maybe"]]
        );
        assert_eq!(sentences("it'-s"), vec![vec!["it", "s"]]);
        assert_eq!(sentences("trailing- word'"), vec![vec!["trailing", "word"]]);
    }

    #[test]
    fn skips_leading_punctuation() {
        assert_eq!(sentences("... \"Hello\" 42x"), vec![vec!["Hello"], vec!["42x"]]);
        assert!(sentences("?!. ,").is_empty());
        assert!(sentences("").is_empty());
    }

    #[test]
    fn unicode_letters() {
        assert_eq!(
            sentences("Mun čállán sámegiela."),
            vec![vec!["Mun", "čállán", "sámegiela"]]
        );
    }

    #[test]
    fn last_sentence() {
        assert_eq!("".last_sentence(), vec![""]);
        assert_eq!("   ".last_sentence(), vec![""]);
        assert_eq!("Hello there.".last_sentence(), vec![""]);
        assert_eq!("Hi. We live he".last_sentence(), vec!["We", "live", "he"]);
        assert_eq!("Hi. We live ".last_sentence(), vec!["We", "live", ""]);
        assert_eq!("I said, no".last_sentence(), vec!["I", "said", "no"]);
        assert_eq!("I said,".last_sentence(), vec!["I", "said", ""]);
    }
}
