//! 서버 렌더링 화면과 폼 핸들러
//!
//! 폼 POST는 처리 후 `/`로 303 리다이렉트하고, 결과 알림은 세션에 한 번만 남깁니다.

pub mod handler;
pub mod page;

pub use page::escape_html;
