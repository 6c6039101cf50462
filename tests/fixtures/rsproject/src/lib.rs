pub struct Tokenizer {
    input: String,
}

pub enum Token {
    Word(String),
    Space,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.input
            .split(' ')
            .map(|w| Token::Word(w.to_string()))
            .collect()
    }
}

pub fn count_words(input: &str) -> usize {
    Tokenizer::new(input).tokens().len()
}
