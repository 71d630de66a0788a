//! 픽스처 사이트 -- 시뮬레이션 브라우저가 응답하는 테스트 페이지
//!
//! 두 테스트 origin(`test1`, `test2`) 아래의 같은 경로에 다음 페이지를 둡니다.
//!
//! | 경로                     | 응답                                  |
//! |--------------------------|---------------------------------------|
//! | `mixed_1.html`           | 혼합 능동 콘텐츠 페이지               |
//! | `mixed_2.html`           | 혼합 능동 콘텐츠 페이지               |
//! | `meta_refresh.html`      | `mixed_1.html`로 meta refresh         |
//! | `redirect`               | `mixed_redirected.html`로 302         |
//! | `mixed_redirected.html`  | 혼합 능동 콘텐츠 페이지               |
//!
//! 상대 경로 대상은 요청 URL 기준으로 해석하므로 리다이렉트는 항상 같은 origin에
//! 머뭅니다.

use std::collections::HashMap;

use url::Url;

pub use mixguard_core::types::{TEST_ROOT_1, TEST_ROOT_2};

/// 픽스처 페이지 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// 혼합 능동 스크립트를 포함하고, 스크립트가 실행되면 상태 표시 요소를 갱신하는 페이지
    MixedContent,
    /// 로드 후 `target`으로 meta refresh 하는 페이지
    MetaRefresh { target: String },
    /// `target`으로 302 응답을 보내는 엔드포인트
    ServerRedirect { target: String },
}

/// 요청 하나에 대한 응답
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// 빈 문서 (`about:blank`)
    Blank,
    /// 혼합 능동 콘텐츠 페이지
    MixedContent,
    /// 커밋 후 다음 URL로 meta refresh 하는 페이지
    MetaRefresh(Url),
    /// 문서 없이 다음 hop으로 넘어가는 서버 리다이렉트
    Redirect(Url),
    /// 알 수 없는 경로
    NotFound,
}

/// 경로 → 픽스처 라우팅 테이블
#[derive(Debug, Clone)]
pub struct FixtureSite {
    routes: HashMap<String, Fixture>,
}

impl FixtureSite {
    /// 빈 사이트를 생성합니다.
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// 표준 픽스처 세트를 등록한 사이트를 생성합니다.
    pub fn standard() -> Self {
        let base = "/browser/mixed-content/";
        Self::empty()
            .route(format!("{base}mixed_1.html"), Fixture::MixedContent)
            .route(format!("{base}mixed_2.html"), Fixture::MixedContent)
            .route(
                format!("{base}meta_refresh.html"),
                Fixture::MetaRefresh {
                    target: "mixed_1.html".to_owned(),
                },
            )
            .route(
                format!("{base}redirect"),
                Fixture::ServerRedirect {
                    target: "mixed_redirected.html".to_owned(),
                },
            )
            .route(format!("{base}mixed_redirected.html"), Fixture::MixedContent)
    }

    /// 경로에 픽스처를 등록합니다. 경로는 모든 호스트에 공통입니다.
    pub fn route(mut self, path: impl Into<String>, fixture: Fixture) -> Self {
        self.routes.insert(path.into(), fixture);
        self
    }

    /// URL 하나를 해석합니다.
    pub fn resolve(&self, url: &Url) -> Response {
        if url.scheme() == "about" {
            return Response::Blank;
        }
        match self.routes.get(url.path()) {
            Some(Fixture::MixedContent) => Response::MixedContent,
            Some(Fixture::MetaRefresh { target }) => match url.join(target) {
                Ok(next) => Response::MetaRefresh(next),
                Err(_) => Response::NotFound,
            },
            Some(Fixture::ServerRedirect { target }) => match url.join(target) {
                Ok(next) => Response::Redirect(next),
                Err(_) => Response::NotFound,
            },
            None => Response::NotFound,
        }
    }
}

impl Default for FixtureSite {
    fn default() -> Self {
        Self::standard()
    }
}
