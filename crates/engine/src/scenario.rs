//! 시나리오 정의와 스위트
//!
//! [`Scenario`]는 엔진에 꽂히는 불변 데이터입니다. 기본 스위트
//! ([`ScenarioSuite::builtin`])는 여섯 시나리오로 같은 origin / 다른 origin과
//! 직접 이동 / meta refresh / 서버 리다이렉트의 조합을 검증합니다.
//!
//! # TOML 형식
//!
//! ```toml
//! [[scenario]]
//! id = "Test1"
//! seed_link_id = "linkForTest1"
//! seed_url = "https://test1.example.com/browser/mixed-content/mixed_1.html"
//! child_url = "https://test1.example.com/browser/mixed-content/mixed_2.html"
//! relation = "same-origin"
//! navigation = "direct"
//! expectation = "absent"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use mixguard_core::error::SuiteError;
use mixguard_core::types::{MarkerState, Origin, TEST_ROOT_1, TEST_ROOT_2};

/// 스위트 파일 최대 크기 (1 MiB)
const MAX_SUITE_FILE_SIZE: u64 = 1024 * 1024;

/// 기본 스위트의 알려진 결함 설명
const KNOWN_REDIRECT_DEFECT: &str = "a same-origin server redirect drops the inherited override";

/// seed 페이지와 자식 링크 사이의 origin 관계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginRelation {
    SameOrigin,
    CrossOrigin,
}

impl OriginRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SameOrigin => "same-origin",
            Self::CrossOrigin => "cross-origin",
        }
    }
}

impl fmt::Display for OriginRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 자식 탭 이동 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationShape {
    Direct,
    MetaRefresh,
    ServerRedirect,
}

impl NavigationShape {
    /// 자식 탭 이동이 만드는 로드 완료 신호 수 (hop마다 하나)
    pub fn load_hops(&self) -> u32 {
        match self {
            Self::Direct => 1,
            Self::MetaRefresh | Self::ServerRedirect => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MetaRefresh => "meta-refresh",
            Self::ServerRedirect => "server-redirect",
        }
    }
}

impl fmt::Display for NavigationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 자식 탭에서 기대하는 프롬프트 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptExpectation {
    /// 프롬프트가 다시 나타나야 함
    Appears,
    /// 프롬프트가 나타나지 않아야 함
    Absent,
    /// 나타나지 않아야 하지만 현재는 나타남 (알려진 결함)
    AppearsButShouldNot,
}

impl PromptExpectation {
    /// 올바른 동작에서 프롬프트가 보여야 하는지
    pub fn prompt_should_appear(&self) -> bool {
        matches!(self, Self::Appears)
    }

    /// 올바른 동작에서의 상태 표시 문자열
    pub fn expected_marker(&self) -> MarkerState {
        if self.prompt_should_appear() {
            MarkerState::Enabled
        } else {
            MarkerState::Disabled
        }
    }

    pub fn is_known_defect(&self) -> bool {
        matches!(self, Self::AppearsButShouldNot)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appears => "appears",
            Self::Absent => "absent",
            Self::AppearsButShouldNot => "appears-but-should-not",
        }
    }
}

impl fmt::Display for PromptExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 자식 링크를 여는 사용자 입력 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationVariant {
    /// 수정자 클릭 (중간 버튼 / accel)
    Primary,
    /// 컨텍스트 메뉴 → 새 탭에서 링크 열기
    Secondary,
}

impl ActivationVariant {
    /// 모든 시나리오는 이 순서대로 두 방식을 실행합니다.
    pub const ALL: [ActivationVariant; 2] = [Self::Primary, Self::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ActivationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 시나리오 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// 시나리오 id. seed 페이지에 주입되는 자식 링크의 요소 id로도 쓰입니다.
    pub id: String,
    /// 메인 페이지의 seed 링크 요소 id
    pub seed_link_id: String,
    /// seed 탭에서 여는 혼합 콘텐츠 페이지
    pub seed_url: Url,
    /// seed 페이지에 주입할 자식 링크 대상
    pub child_url: Url,
    pub relation: OriginRelation,
    pub navigation: NavigationShape,
    pub expectation: PromptExpectation,
    /// 알려진 결함 설명 (`appears-but-should-not`에 필수)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_defect: Option<String>,
}

impl Scenario {
    /// seed 페이지에 주입되는 자식 링크 요소 id
    pub fn child_link_id(&self) -> &str {
        &self.id
    }

    /// 시나리오 정의를 검증합니다.
    pub fn validate(&self) -> Result<(), SuiteError> {
        let invalid = |reason: String| SuiteError::Invalid {
            scenario: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_owned()));
        }
        if self.seed_link_id.trim().is_empty() {
            return Err(invalid("seed_link_id must not be empty".to_owned()));
        }
        if self.id == self.seed_link_id {
            return Err(invalid("id and seed_link_id must differ".to_owned()));
        }
        for (field, url) in [("seed_url", &self.seed_url), ("child_url", &self.child_url)] {
            if Origin::of(url).is_none() {
                return Err(invalid(format!("{field} '{url}' has no tuple origin")));
            }
        }

        let same = Origin::same_origin(&self.seed_url, &self.child_url);
        let declared_same = self.relation == OriginRelation::SameOrigin;
        if same != declared_same {
            return Err(invalid(format!(
                "relation is {} but {} and {} are {}",
                self.relation,
                self.seed_url,
                self.child_url,
                if same { "same-origin" } else { "cross-origin" }
            )));
        }

        match (self.expectation.is_known_defect(), &self.known_defect) {
            (true, None) => Err(invalid(
                "appears-but-should-not requires a known_defect note".to_owned(),
            )),
            (false, Some(_)) => Err(invalid(
                "known_defect is only allowed with appears-but-should-not".to_owned(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Deserialize)]
struct SuiteFile {
    #[serde(default)]
    scenario: Vec<Scenario>,
}

/// 순서가 있는 시나리오 목록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSuite {
    scenarios: Vec<Scenario>,
}

impl ScenarioSuite {
    /// 검증된 스위트를 생성합니다.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, SuiteError> {
        let suite = Self { scenarios };
        suite.validate()?;
        Ok(suite)
    }

    /// 기본 여섯 시나리오
    pub fn builtin() -> Result<Self, SuiteError> {
        let page = |root: &str, file: &str| -> Result<Url, SuiteError> {
            Url::parse(root)
                .and_then(|base| base.join(file))
                .map_err(|e| SuiteError::Invalid {
                    scenario: "<builtin>".to_owned(),
                    reason: format!("bad fixture url {root}{file}: {e}"),
                })
        };

        let scenario = |n: u32,
                        (seed_root, seed_file): (&str, &str),
                        (child_root, child_file): (&str, &str),
                        relation: OriginRelation,
                        navigation: NavigationShape,
                        expectation: PromptExpectation|
         -> Result<Scenario, SuiteError> {
            Ok(Scenario {
                id: format!("Test{n}"),
                seed_link_id: format!("linkForTest{n}"),
                seed_url: page(seed_root, seed_file)?,
                child_url: page(child_root, child_file)?,
                relation,
                navigation,
                expectation,
                known_defect: expectation
                    .is_known_defect()
                    .then(|| KNOWN_REDIRECT_DEFECT.to_owned()),
            })
        };

        use NavigationShape::{Direct, MetaRefresh, ServerRedirect};
        use OriginRelation::{CrossOrigin, SameOrigin};
        use PromptExpectation::{Absent, Appears, AppearsButShouldNot};

        Self::new(vec![
            scenario(
                1,
                (TEST_ROOT_1, "mixed_1.html"),
                (TEST_ROOT_1, "mixed_2.html"),
                SameOrigin,
                Direct,
                Absent,
            )?,
            scenario(
                2,
                (TEST_ROOT_1, "mixed_2.html"),
                (TEST_ROOT_2, "mixed_2.html"),
                CrossOrigin,
                Direct,
                Appears,
            )?,
            scenario(
                3,
                (TEST_ROOT_1, "mixed_1.html"),
                (TEST_ROOT_1, "meta_refresh.html"),
                SameOrigin,
                MetaRefresh,
                Absent,
            )?,
            scenario(
                4,
                (TEST_ROOT_2, "mixed_1.html"),
                (TEST_ROOT_1, "meta_refresh.html"),
                CrossOrigin,
                MetaRefresh,
                Appears,
            )?,
            scenario(
                5,
                (TEST_ROOT_1, "mixed_1.html"),
                (TEST_ROOT_1, "redirect"),
                SameOrigin,
                ServerRedirect,
                AppearsButShouldNot,
            )?,
            scenario(
                6,
                (TEST_ROOT_1, "mixed_1.html"),
                (TEST_ROOT_2, "redirect"),
                CrossOrigin,
                ServerRedirect,
                Appears,
            )?,
        ])
    }

    /// TOML 문자열에서 스위트를 파싱하고 검증합니다.
    pub fn from_toml_str(content: &str) -> Result<Self, SuiteError> {
        let file: SuiteFile = toml::from_str(content).map_err(|e| SuiteError::Parse {
            reason: e.to_string(),
        })?;
        Self::new(file.scenario)
    }

    /// 파일에서 스위트를 로드합니다.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SuiteError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SuiteError::Parse {
                    reason: format!("{}: failed to read metadata: {e}", path.display()),
                }
            }
        })?;

        if metadata.len() > MAX_SUITE_FILE_SIZE {
            return Err(SuiteError::Parse {
                reason: format!(
                    "{}: file too large: {} bytes (max: {MAX_SUITE_FILE_SIZE})",
                    path.display(),
                    metadata.len()
                ),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SuiteError::Parse {
            reason: format!("{}: failed to read file: {e}", path.display()),
        })?;
        let suite = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), scenarios = suite.len(), "loaded scenario suite");
        Ok(suite)
    }

    /// 지정한 id의 시나리오만 남긴 스위트를 만듭니다. 순서는 원래 스위트를 따릅니다.
    pub fn filter<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, SuiteError> {
        for id in ids {
            let id = id.as_ref();
            if !self.scenarios.iter().any(|s| s.id == id) {
                return Err(SuiteError::Invalid {
                    scenario: id.to_owned(),
                    reason: "no such scenario in suite".to_owned(),
                });
            }
        }
        let scenarios = self
            .scenarios
            .iter()
            .filter(|s| ids.iter().any(|id| id.as_ref() == s.id))
            .cloned()
            .collect();
        Self::new(scenarios)
    }

    fn validate(&self) -> Result<(), SuiteError> {
        if self.scenarios.is_empty() {
            return Err(SuiteError::Invalid {
                scenario: "<suite>".to_owned(),
                reason: "suite must contain at least one scenario".to_owned(),
            });
        }

        let mut ids = HashSet::new();
        let mut seed_links = HashSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !ids.insert(scenario.id.as_str()) {
                return Err(SuiteError::Invalid {
                    scenario: scenario.id.clone(),
                    reason: "duplicate scenario id".to_owned(),
                });
            }
            if !seed_links.insert(scenario.seed_link_id.as_str()) {
                return Err(SuiteError::Invalid {
                    scenario: scenario.id.clone(),
                    reason: format!("duplicate seed_link_id '{}'", scenario.seed_link_id),
                });
            }
        }
        Ok(())
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

impl<'a> IntoIterator for &'a ScenarioSuite {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
