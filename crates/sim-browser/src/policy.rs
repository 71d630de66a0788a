//! 혼합 콘텐츠 차단 정책 -- 탭 단위 오버라이드와 origin 범위 판정
//!
//! 사용자가 프롬프트에서 보호를 해제하면 해당 탭에 문서 origin이 기록됩니다.
//! 그 탭의 링크로 연 새 탭은 오버라이드를 물려받고, 물려받은 오버라이드는
//! 최종 문서가 같은 origin일 때만 효력이 있습니다.

use mixguard_core::Origin;
use url::Url;

/// opener 탭에서 새 탭으로 물려줄 오버라이드를 계산합니다.
///
/// opener의 오버라이드가 opener 문서의 origin과 일치할 때만 상속됩니다.
pub fn inherited_override(
    opener_override: Option<&Origin>,
    opener_doc: Option<&Url>,
) -> Option<Origin> {
    let opener_origin = opener_doc.and_then(Origin::of)?;
    match opener_override {
        Some(granted) if *granted == opener_origin => Some(opener_origin),
        _ => None,
    }
}

/// 문서에서 혼합 능동 콘텐츠 실행을 허용하는지 판정합니다.
pub fn allows_mixed_content(
    blocking_enabled: bool,
    override_origin: Option<&Origin>,
    doc: &Url,
) -> bool {
    if !blocking_enabled {
        return true;
    }
    match (override_origin, Origin::of(doc)) {
        (Some(granted), Some(origin)) => *granted == origin,
        _ => false,
    }
}

/// 서버 리다이렉트 hop을 지난 뒤 남는 오버라이드
pub fn after_server_redirect(current: Option<Origin>, keeps_override: bool) -> Option<Origin> {
    if keeps_override { current } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn origin(s: &str) -> Origin {
        Origin::of(&url(s)).unwrap()
    }

    #[test]
    fn override_is_inherited_only_from_matching_document() {
        let granted = origin("https://test1.example.com/");
        let same = url("https://test1.example.com/a.html");
        let other = url("https://test2.example.com/a.html");

        assert_eq!(
            inherited_override(Some(&granted), Some(&same)),
            Some(granted.clone())
        );
        assert_eq!(inherited_override(Some(&granted), Some(&other)), None);
        assert_eq!(inherited_override(None, Some(&same)), None);
        assert_eq!(inherited_override(Some(&granted), None), None);
    }

    #[test]
    fn override_applies_to_same_origin_only() {
        let granted = origin("https://test1.example.com/");
        assert!(allows_mixed_content(
            true,
            Some(&granted),
            &url("https://test1.example.com/x.html")
        ));
        assert!(!allows_mixed_content(
            true,
            Some(&granted),
            &url("https://test2.example.com/x.html")
        ));
        assert!(!allows_mixed_content(true, None, &url("https://test1.example.com/")));
    }

    #[test]
    fn disabled_blocking_allows_everything() {
        assert!(allows_mixed_content(false, None, &url("https://test2.example.com/")));
    }

    #[test]
    fn server_redirect_drops_override_unless_kept() {
        let granted = origin("https://test1.example.com/");
        assert_eq!(after_server_redirect(Some(granted.clone()), false), None);
        assert_eq!(
            after_server_redirect(Some(granted.clone()), true),
            Some(granted)
        );
    }
}
