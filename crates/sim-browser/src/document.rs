//! 시뮬레이션 문서 -- id로 찾을 수 있는 링크와 텍스트 요소만 가집니다.

use mixguard_core::MarkerState;
use mixguard_core::types::MARKER_ELEMENT_ID;
use url::Url;

/// 문서 요소 내용
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Link { href: Url },
    Text { text: String },
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub id: String,
    pub kind: ElementKind,
}

/// 탭에 커밋된 문서
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub url: Url,
    elements: Vec<Element>,
}

impl Document {
    pub fn blank(url: Url) -> Self {
        Self {
            url,
            elements: Vec::new(),
        }
    }

    /// 상태 표시 요소를 가진 혼합 콘텐츠 페이지
    pub fn mixed_content(url: Url, marker: MarkerState) -> Self {
        let mut doc = Self::blank(url);
        doc.set_text(MARKER_ELEMENT_ID, marker.text());
        doc
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.element(id).map(|e| &e.kind) {
            Some(ElementKind::Text { text }) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: &str, text: &str) {
        self.upsert(Element {
            id: id.to_owned(),
            kind: ElementKind::Text {
                text: text.to_owned(),
            },
        });
    }

    pub fn append_link(&mut self, id: &str, href: Url) {
        self.upsert(Element {
            id: id.to_owned(),
            kind: ElementKind::Link { href },
        });
    }

    // 같은 id가 있으면 교체
    fn upsert(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_content_page_exposes_marker() {
        let url = Url::parse("https://test1.example.com/a.html").unwrap();
        let mut doc = Document::mixed_content(url, MarkerState::Enabled);
        assert_eq!(doc.text(MARKER_ELEMENT_ID), Some(MarkerState::Enabled.text()));

        doc.set_text(MARKER_ELEMENT_ID, MarkerState::Disabled.text());
        assert_eq!(doc.text(MARKER_ELEMENT_ID), Some(MarkerState::Disabled.text()));
    }

    #[test]
    fn append_link_replaces_same_id() {
        let url = Url::parse("about:blank").unwrap();
        let mut doc = Document::blank(url);
        let first = Url::parse("https://test1.example.com/1").unwrap();
        let second = Url::parse("https://test1.example.com/2").unwrap();
        doc.append_link("Test1", first);
        doc.append_link("Test1", second.clone());
        match &doc.element("Test1").unwrap().kind {
            ElementKind::Link { href } => assert_eq!(href, &second),
            other => panic!("expected link, got {other:?}"),
        }
    }
}
