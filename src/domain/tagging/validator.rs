//! 모델 출력 → 태그 3개 보정
//!
//! 모델은 자유 텍스트를 돌려주므로 어휘 필터링 후 키워드 매칭과 기본 목록으로 채웁니다.
//! 기본 목록의 `issue`는 어휘에 없어서 결과가 3개보다 적을 수 있습니다(알려진 결함).
//! 이 경우 조용히 고치지 않고 경고 로그와 `tags_underfilled_total` 카운터로 드러냅니다.

use std::fmt;

use super::vocabulary::{Tag, ALL_TAGS};

/// 결과 태그 수
pub const TAG_COUNT: usize = 3;

/// 키워드 매칭 후에도 모자랄 때 쓰는 기본 목록
pub const DEFAULT_FALLBACK: [&str; 3] = ["error", "technical", "issue"];

/// 각 태그가 어디서 왔는지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    Model,
    Keyword,
    Default,
}

/// 보정 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelection {
    picks: Vec<(Tag, TagSource)>,
}

impl TagSelection {
    #[cfg(test)]
    fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.picks.iter().map(|(tag, _)| *tag)
    }

    fn len(&self) -> usize {
        self.picks.len()
    }

    /// 기본 목록 결함으로 3개를 못 채운 경우
    pub fn is_underfilled(&self) -> bool {
        self.picks.len() < TAG_COUNT
    }

    pub fn count_from(&self, source: TagSource) -> usize {
        self.picks.iter().filter(|(_, s)| *s == source).count()
    }

    fn contains(&self, tag: Tag) -> bool {
        self.picks.iter().any(|(t, _)| *t == tag)
    }

    fn push(&mut self, tag: Tag, source: TagSource) {
        if self.picks.len() < TAG_COUNT && !self.contains(tag) {
            self.picks.push((tag, source));
        }
    }

    fn is_full(&self) -> bool {
        self.picks.len() >= TAG_COUNT
    }
}

impl fmt::Display for TagSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (tag, _)) in self.picks.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

/// 모델 출력과 티켓 본문으로 태그를 고른다. 실패하지 않음
pub fn select_tags(raw_output: &str, ticket_text: &str) -> TagSelection {
    let mut selection = TagSelection {
        picks: Vec::with_capacity(TAG_COUNT),
    };

    // 1-2. 쉼표 분리 → trim → 소문자 → 어휘 필터
    for candidate in raw_output.split(',') {
        let candidate = candidate.trim().to_lowercase();
        if candidate.is_empty() {
            continue;
        }
        if let Some(tag) = Tag::parse(&candidate) {
            selection.push(tag, TagSource::Model);
        }
    }

    if selection.is_full() {
        return selection;
    }

    // 3-4. 어휘 선언 순서대로 키워드 매칭
    let lowered = ticket_text.to_lowercase();
    for tag in ALL_TAGS {
        if selection.is_full() {
            break;
        }
        if tag.matches(&lowered) {
            selection.push(tag, TagSource::Keyword);
        }
    }

    // 5. 기본 목록. 어휘에 없는 항목은 건너뜀
    for fallback in DEFAULT_FALLBACK {
        if selection.is_full() {
            break;
        }
        if let Some(tag) = Tag::parse(fallback) {
            selection.push(tag, TagSource::Default);
        }
    }

    if selection.is_underfilled() {
        tracing::warn!(
            tags = %selection,
            count = selection.len(),
            "Default fallback list could not fill three tags"
        );
        metrics::counter!("tags_underfilled_total").increment(1);
    }

    selection
}
