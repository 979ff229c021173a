//! 분류 프롬프트 생성
//!
//! 티켓 본문은 검증 없이 그대로 삽입합니다.

pub mod examples;

use std::fmt::Write;

use super::vocabulary::vocabulary_list;
use examples::EXAMPLES;

/// 예제 없이 지시문만 주는 Zero-Shot 프롬프트
pub fn zero_shot_prompt(text: &str) -> String {
    format!(
        "Classify this support ticket by selecting exactly 3 tags from the following list: {}. \
         Choose the most relevant tags based on the ticket's content. \
         Return only the 3 tags separated by commas, no additional text. \
         Ticket: '{}'",
        vocabulary_list(),
        text
    )
}

/// 예제 4개를 붙이고 `Tags:`로 끝나는 Few-Shot 프롬프트
pub fn few_shot_prompt(text: &str) -> String {
    let mut prompt = format!(
        "Classify support tickets by selecting exactly 3 tags from the following list: {}. \
         Return only the 3 tags separated by commas, no additional text.\n\n",
        vocabulary_list()
    );

    for (index, example) in EXAMPLES.iter().enumerate() {
        // String에 대한 write!는 실패하지 않음
        let _ = write!(
            prompt,
            "Example {}:\nTicket: {}\nTags: {}\n\n",
            index + 1,
            example.ticket,
            example.tags
        );
    }

    let _ = write!(prompt, "Ticket: {}\nTags:", text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shot_prompt_matches_template() {
        let prompt = zero_shot_prompt("My wifi is down");
        assert_eq!(
            prompt,
            "Classify this support ticket by selecting exactly 3 tags from the following list: \
             internet, account, payment, technical, login, error, server, website, reset, password, connectivity, crash. \
             Choose the most relevant tags based on the ticket's content. \
             Return only the 3 tags separated by commas, no additional text. \
             Ticket: 'My wifi is down'"
        );
    }

    #[test]
    fn few_shot_prompt_lists_examples_in_order() {
        let prompt = few_shot_prompt("x");
        let first = prompt.find("Example 1:\nTicket: I forgot my password").unwrap();
        let fourth = prompt.find("Example 4:\nTicket: My internet connection").unwrap();
        assert!(first < fourth);
        assert!(prompt.contains("Tags: website, error, server\n\n"));
        assert!(prompt.starts_with("Classify support tickets by selecting exactly 3 tags"));
        assert!(prompt.contains("no additional text.\n\nExample 1:"));
    }

    #[test]
    fn few_shot_prompt_ends_with_open_tags_cue() {
        let prompt = few_shot_prompt("Payment page shows error");
        assert!(prompt.ends_with("\n\nTicket: Payment page shows error\nTags:"));
    }

    #[test]
    fn prompts_pass_text_through_unchanged() {
        assert!(zero_shot_prompt("").ends_with("Ticket: ''"));
        assert!(few_shot_prompt("  spaced  ").contains("Ticket:   spaced  \nTags:"));
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(zero_shot_prompt("a"), zero_shot_prompt("a"));
        assert_eq!(few_shot_prompt("a"), few_shot_prompt("a"));
    }
}
