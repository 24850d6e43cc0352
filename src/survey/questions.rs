//! The fixed survey question set.

/// Number of questions every survey run asks.
pub const QUESTION_COUNT: usize = 7;

/// Questions asked in order, one per inbound answer.
pub const QUESTIONS: [&str; QUESTION_COUNT] = [
    "1. What is your main goal in using the product or service?",
    "2. What problems are you trying to solve?",
    "3. What is your budget for a solution?",
    "4. How much experience do you have with similar products?",
    "5. How quickly do you need a solution?",
    "6. Which features matter most to you?",
    "7. What could influence your decision to buy?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_questions_numbered_in_order() {
        assert_eq!(QUESTIONS.len(), QUESTION_COUNT);
        for (i, q) in QUESTIONS.iter().enumerate() {
            assert!(
                q.starts_with(&format!("{}.", i + 1)),
                "question {i} should carry its ordinal: {q}"
            );
        }
    }
}
