#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use url::Url;

use mixguard_core::types::Origin;
use mixguard_sim_browser::policy;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    opener_doc: String,
    /// 오버라이드가 부여된 문서 (없으면 오버라이드 없음)
    granted_on: Option<String>,
    child_doc: String,
    blocking: bool,
    keeps_override: bool,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(opener) = Url::parse(&input.opener_doc) else {
        return;
    };
    let Ok(child) = Url::parse(&input.child_doc) else {
        return;
    };
    let granted = input
        .granted_on
        .as_deref()
        .and_then(|s| Url::parse(s).ok())
        .and_then(|u| Origin::of(&u));

    let inherited = policy::inherited_override(granted.as_ref(), Some(&opener));

    // 상속된 오버라이드는 항상 opener 문서의 origin
    if let Some(ref origin) = inherited {
        assert_eq!(Some(origin), Origin::of(&opener).as_ref());
    }

    let allowed = policy::allows_mixed_content(input.blocking, inherited.as_ref(), &child);
    if input.blocking && allowed {
        // 차단 중 허용되려면 같은 origin이어야 함
        assert!(Origin::same_origin(&opener, &child));
    }

    let after = policy::after_server_redirect(inherited.clone(), input.keeps_override);
    if !input.keeps_override {
        assert!(after.is_none());
    }
});
