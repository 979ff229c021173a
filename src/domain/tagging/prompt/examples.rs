//! Few-Shot 예제
//!
//! 출력 형식을 유도하기 위한 (티켓, 태그) 쌍 4개입니다.

/// Few-Shot 예제 한 건
pub struct FewShotExample {
    pub ticket: &'static str,
    pub tags: &'static str,
}

pub const EXAMPLES: [FewShotExample; 4] = [
    FewShotExample {
        ticket: "I forgot my password and can't log in.",
        tags: "login, account, reset",
    },
    FewShotExample {
        ticket: "Website keeps crashing with error 500.",
        tags: "website, error, server",
    },
    FewShotExample {
        ticket: "Payment failed but money was charged.",
        tags: "payment, error, account",
    },
    FewShotExample {
        ticket: "My internet connection has been down since yesterday.",
        tags: "internet, technical, connectivity",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tagging::vocabulary::Tag;

    #[test]
    fn every_example_answer_has_three_vocabulary_tags() {
        for example in &EXAMPLES {
            let tags: Vec<&str> = example.tags.split(", ").collect();
            assert_eq!(tags.len(), 3, "{}", example.ticket);
            assert!(tags.iter().all(|t| Tag::parse(t).is_some()));
        }
    }
}
