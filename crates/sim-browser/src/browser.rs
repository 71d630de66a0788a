//! Deterministic in-process browser implementing the host capability traits.
//!
//! [`SimBrowser`] keeps one window worth of tabs behind a `tokio::sync::Mutex`
//! and runs every navigation as a spawned task, so load completions arrive
//! asynchronously exactly like they would from a real host:
//!
//! - each navigation hop sleeps `load_latency_ms`, commits (or redirects) and
//!   fires one [`LoadEvent`];
//! - a newer navigation of the same tab bumps the tab's epoch and silently
//!   cancels the older one;
//! - blocked mixed content registers a [`PromptKind::MixedContentBlocked`]
//!   prompt whose only action disables protection for the document's origin
//!   and reloads the tab.
//!
//! After the override reload the page's mixed script updates the marker
//! element `override_script_delay_ms` after the load event, which is what the
//! engine's condition poller waits for.
//!
//! # Examples
//!
//! ```ignore
//! use mixguard_core::config::HostConfig;
//! use mixguard_sim_browser::SimBrowser;
//!
//! let browser = SimBrowser::new(HostConfig::default());
//! let main_tab = browser.open_window().await?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, oneshot};
use tracing::{debug, info, warn};
use url::Url;

use mixguard_core::config::{DEFAULT_POLICY_PREF, HostConfig};
use mixguard_core::types::MARKER_ELEMENT_ID;
use mixguard_core::{
    ClickEvent, ContentAccess, ElementRef, GestureRouting, HostError, LinkTarget, LoadEvent,
    MarkerState, MenuCommand, MouseEventInit, MouseEventKind, Origin, PopupEvent, Preferences,
    PromptAction, PromptActionKind, PromptHandle, PromptKind, PromptRegistry, TabId, TabStrip,
};

use crate::document::{Document, ElementKind};
use crate::fixtures::{FixtureSite, Response};
use crate::policy;

/// Capacity of the load / popup broadcast channels.
const SIGNAL_CAPACITY: usize = 64;

/// Redirect hops followed before a navigation is abandoned.
const MAX_NAVIGATION_HOPS: u32 = 10;

const DISABLE_PROTECTION_LABEL: &str = "Disable Protection on This Page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationKind {
    Normal,
    /// Reload triggered by the disable-protection prompt action.
    OverrideReload,
}

struct TabState {
    id: TabId,
    document: Option<Document>,
    /// Origin the user disabled protection for, in this tab.
    override_origin: Option<Origin>,
    /// Bumped on every navigation start; stale navigation tasks compare and bail.
    epoch: u64,
}

impl TabState {
    fn new(id: TabId) -> Self {
        Self {
            id,
            document: None,
            override_origin: None,
            epoch: 0,
        }
    }
}

struct PromptEntry {
    generation: u64,
    actions: Vec<PromptAction>,
}

#[derive(Default)]
struct BrowserState {
    window_open: bool,
    tabs: Vec<TabState>,
    selected: usize,
    next_tab: u64,
    prompts: HashMap<(TabId, PromptKind), PromptEntry>,
    next_generation: u64,
    prefs: HashMap<String, bool>,
    click_interceptor: Option<oneshot::Sender<ClickEvent>>,
    popup_target: Option<ElementRef>,
}

impl BrowserState {
    fn ensure_open(&self) -> Result<(), HostError> {
        if self.window_open {
            Ok(())
        } else {
            Err(HostError::WindowUnavailable("no test window is open".to_owned()))
        }
    }

    fn tab(&self, id: TabId) -> Result<&TabState, HostError> {
        self.tabs
            .iter()
            .find(|t| t.id == id)
            .ok_or(HostError::TabNotFound(id))
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut TabState, HostError> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(HostError::TabNotFound(id))
    }

    fn document(&self, id: TabId) -> Result<&Document, HostError> {
        self.tab(id)?
            .document
            .as_ref()
            .ok_or(HostError::NoDocument(id))
    }

    fn allocate_tab(&mut self) -> TabId {
        self.next_tab += 1;
        TabId::new(self.next_tab)
    }

    fn show_prompt(&mut self, tab: TabId, kind: PromptKind) {
        self.next_generation += 1;
        self.prompts.insert(
            (tab, kind),
            PromptEntry {
                generation: self.next_generation,
                actions: vec![PromptAction {
                    kind: PromptActionKind::DisableProtection,
                    label: DISABLE_PROTECTION_LABEL.to_owned(),
                }],
            },
        );
    }

    /// Forgets everything attached to a closed tab.
    fn forget_tab(&mut self, id: TabId) {
        self.prompts.retain(|(tab, _), _| *tab != id);
        if self.popup_target.as_ref().is_some_and(|t| t.tab == id) {
            self.popup_target = None;
        }
    }

    /// href of a link element, `Ok(None)` for a non-link element.
    fn link_href(&self, target: &ElementRef) -> Result<Option<Url>, HostError> {
        let element = self
            .document(target.tab)?
            .element(&target.element_id)
            .ok_or_else(|| HostError::ElementNotFound {
                tab: target.tab,
                element_id: target.element_id.clone(),
            })?;
        Ok(match &element.kind {
            ElementKind::Link { href } => Some(href.clone()),
            ElementKind::Text { .. } => None,
        })
    }
}

struct Inner {
    state: Mutex<BrowserState>,
    site: FixtureSite,
    config: HostConfig,
    /// Preference gating the blocking policy.
    policy_pref: String,
    known_prefs: HashSet<String>,
    window_blocked: bool,
    load_tx: broadcast::Sender<LoadEvent>,
    popup_tx: broadcast::Sender<PopupEvent>,
}

impl Inner {
    fn blocking_enabled(&self, state: &BrowserState) -> bool {
        state.prefs.get(&self.policy_pref).copied().unwrap_or(false)
    }
}

/// Builder for [`SimBrowser`].
pub struct SimBrowserBuilder {
    config: HostConfig,
    site: FixtureSite,
    policy_pref: String,
    extra_prefs: Vec<String>,
    window_blocked: bool,
}

impl SimBrowserBuilder {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            site: FixtureSite::standard(),
            policy_pref: DEFAULT_POLICY_PREF.to_owned(),
            extra_prefs: Vec::new(),
            window_blocked: false,
        }
    }

    /// Replaces the standard fixture site.
    pub fn site(mut self, site: FixtureSite) -> Self {
        self.site = site;
        self
    }

    /// Name of the boolean preference that turns mixed content blocking on.
    pub fn policy_pref(mut self, name: impl Into<String>) -> Self {
        self.policy_pref = name.into();
        self
    }

    /// Registers an additional boolean preference.
    pub fn known_pref(mut self, name: impl Into<String>) -> Self {
        self.extra_prefs.push(name.into());
        self
    }

    /// Makes `open_window` fail, like a host whose window never appears.
    pub fn block_windows(mut self) -> Self {
        self.window_blocked = true;
        self
    }

    pub fn build(self) -> SimBrowser {
        let (load_tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        let (popup_tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        let mut known_prefs: HashSet<String> = self.extra_prefs.into_iter().collect();
        known_prefs.insert(self.policy_pref.clone());

        SimBrowser {
            inner: Arc::new(Inner {
                state: Mutex::new(BrowserState::default()),
                site: self.site,
                config: self.config,
                policy_pref: self.policy_pref,
                known_prefs,
                window_blocked: self.window_blocked,
                load_tx,
                popup_tx,
            }),
        }
    }
}

/// Simulated browser host.
///
/// Cheap to clone; clones share the same window.
#[derive(Clone)]
pub struct SimBrowser {
    inner: Arc<Inner>,
}

impl SimBrowser {
    /// Browser with the standard fixture site and default policy preference.
    pub fn new(config: HostConfig) -> Self {
        SimBrowserBuilder::new(config).build()
    }

    pub fn builder(config: HostConfig) -> SimBrowserBuilder {
        SimBrowserBuilder::new(config)
    }

    /// Origin for which protection is currently disabled in `tab`, if any.
    pub async fn override_origin(&self, tab: TabId) -> Result<Option<Origin>, HostError> {
        let state = self.inner.state.lock().await;
        Ok(state.tab(tab)?.override_origin.clone())
    }

    /// Whether the next content click would go to a live interception.
    pub async fn click_interception_armed(&self) -> bool {
        let state = self.inner.state.lock().await;
        state
            .click_interceptor
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    fn start_navigation(
        &self,
        state: &mut BrowserState,
        tab: TabId,
        url: Url,
        kind: NavigationKind,
    ) -> Result<(), HostError> {
        let current = state.tab_mut(tab)?;
        current.epoch += 1;
        let epoch = current.epoch;
        state.prompts.retain(|(id, _), _| *id != tab);

        debug!(tab = %tab, url = %url, epoch, ?kind, "navigation started");
        tokio::spawn(run_navigation(Arc::clone(&self.inner), tab, epoch, url, kind));
        Ok(())
    }

    fn open_link_in_new_tab(
        &self,
        state: &mut BrowserState,
        opener: TabId,
        href: Url,
    ) -> Result<TabId, HostError> {
        let opener_state = state.tab(opener)?;
        let inherited = policy::inherited_override(
            opener_state.override_origin.as_ref(),
            opener_state.document.as_ref().map(|d| &d.url),
        );

        let id = state.allocate_tab();
        let mut tab = TabState::new(id);
        tab.override_origin = inherited;
        state.tabs.push(tab);

        info!(
            opener = %opener,
            tab = %id,
            url = %href,
            "opening link in new background tab"
        );
        self.start_navigation(state, id, href, NavigationKind::Normal)?;
        Ok(id)
    }

    fn route_click(&self, state: &mut BrowserState, event: ClickEvent) -> Result<(), HostError> {
        if event.opens_new_tab() {
            self.open_link_in_new_tab(state, event.source.tab, event.href)
                .map(|_| ())
        } else {
            self.start_navigation(state, event.source.tab, event.href, NavigationKind::Normal)
        }
    }
}

async fn run_navigation(
    inner: Arc<Inner>,
    tab: TabId,
    epoch: u64,
    mut url: Url,
    kind: NavigationKind,
) {
    let latency = Duration::from_millis(inner.config.load_latency_ms);
    let meta_delay = Duration::from_millis(inner.config.meta_refresh_delay_ms);
    let script_delay = Duration::from_millis(inner.config.override_script_delay_ms);

    for _ in 0..MAX_NAVIGATION_HOPS {
        tokio::time::sleep(latency).await;
        let response = inner.site.resolve(&url);

        let next_hop = {
            let mut state = inner.state.lock().await;
            let blocking = inner.blocking_enabled(&state);
            let Some(current) = state.tabs.iter_mut().find(|t| t.id == tab) else {
                debug!(tab = %tab, "tab closed, dropping navigation");
                return;
            };
            if current.epoch != epoch {
                debug!(tab = %tab, "superseded navigation dropped");
                return;
            }

            match response {
                Response::Redirect(target) => {
                    current.override_origin = policy::after_server_redirect(
                        current.override_origin.take(),
                        inner.config.server_redirect_keeps_override,
                    );
                    debug!(tab = %tab, from = %url, to = %target, "server redirect");
                    Some((target, Duration::ZERO))
                }
                Response::MetaRefresh(target) => {
                    current.document = Some(Document::blank(url.clone()));
                    Some((target, meta_delay))
                }
                Response::Blank | Response::NotFound => {
                    current.document = Some(Document::blank(url.clone()));
                    None
                }
                Response::MixedContent => {
                    let allowed = policy::allows_mixed_content(
                        blocking,
                        current.override_origin.as_ref(),
                        &url,
                    );
                    let delayed = allowed
                        && kind == NavigationKind::OverrideReload
                        && !script_delay.is_zero();
                    let marker = if allowed && !delayed {
                        MarkerState::Disabled
                    } else {
                        MarkerState::Enabled
                    };
                    current.document = Some(Document::mixed_content(url.clone(), marker));

                    if !allowed {
                        state.show_prompt(tab, PromptKind::MixedContentBlocked);
                        info!(tab = %tab, url = %url, "mixed active content blocked");
                    }
                    if delayed {
                        let script = run_mixed_script(Arc::clone(&inner), tab, epoch, script_delay);
                        tokio::spawn(script);
                    }
                    None
                }
            }
        };

        // 수신자가 없으면 무시
        let _ = inner.load_tx.send(LoadEvent {
            tab,
            url: url.clone(),
        });
        debug!(tab = %tab, url = %url, "load complete");

        match next_hop {
            Some((next, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                url = next;
            }
            None => return,
        }
    }

    warn!(tab = %tab, "too many navigation hops, navigation abandoned");
}

/// Mixed script of an override reload: flips the marker once it has run.
async fn run_mixed_script(inner: Arc<Inner>, tab: TabId, epoch: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let mut state = inner.state.lock().await;
    let Some(current) = state.tabs.iter_mut().find(|t| t.id == tab) else {
        return;
    };
    if current.epoch != epoch {
        return;
    }
    if let Some(doc) = current.document.as_mut() {
        doc.set_text(MARKER_ELEMENT_ID, MarkerState::Disabled.text());
        debug!(tab = %tab, "mixed script executed");
    }
}

impl TabStrip for SimBrowser {
    async fn open_window(&self) -> Result<TabId, HostError> {
        if self.inner.window_blocked {
            return Err(HostError::WindowUnavailable(
                "window creation blocked".to_owned(),
            ));
        }
        let mut state = self.inner.state.lock().await;
        if state.window_open {
            return Err(HostError::WindowUnavailable(
                "a test window is already open".to_owned(),
            ));
        }

        let id = state.allocate_tab();
        let mut main = TabState::new(id);
        let blank = Url::parse("about:blank")
            .map_err(|e| HostError::WindowUnavailable(format!("blank url: {e}")))?;
        main.document = Some(Document::blank(blank));

        state.tabs = vec![main];
        state.selected = 0;
        state.window_open = true;
        info!(main_tab = %id, "test window opened");
        Ok(id)
    }

    async fn close_window(&self) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        state.tabs.clear();
        state.prompts.clear();
        state.selected = 0;
        state.click_interceptor = None;
        state.popup_target = None;
        state.window_open = false;
        info!("test window closed");
        Ok(())
    }

    async fn tabs(&self) -> Result<Vec<TabId>, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        Ok(state.tabs.iter().map(|t| t.id).collect())
    }

    async fn selected_tab(&self) -> Result<TabId, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        state
            .tabs
            .get(state.selected)
            .map(|t| t.id)
            .ok_or_else(|| HostError::WindowUnavailable("window has no tabs".to_owned()))
    }

    async fn select_tab_at(&self, index: usize) -> Result<TabId, HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let len = state.tabs.len();
        let id = state
            .tabs
            .get(index)
            .map(|t| t.id)
            .ok_or(HostError::TabIndexOutOfRange { index, len })?;
        state.selected = index;
        Ok(id)
    }

    async fn select_tab(&self, tab: TabId) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let index = state
            .tabs
            .iter()
            .position(|t| t.id == tab)
            .ok_or(HostError::TabNotFound(tab))?;
        state.selected = index;
        Ok(())
    }

    async fn add_tab(&self, url: &Url) -> Result<TabId, HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let id = state.allocate_tab();
        state.tabs.push(TabState::new(id));
        self.start_navigation(&mut state, id, url.clone(), NavigationKind::Normal)?;
        Ok(id)
    }

    async fn remove_current_tab(&self) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let index = state.selected;
        if index >= state.tabs.len() {
            return Err(HostError::TabIndexOutOfRange {
                index,
                len: state.tabs.len(),
            });
        }
        let removed = state.tabs.remove(index);
        state.forget_tab(removed.id);
        debug!(tab = %removed.id, "tab removed");

        if state.tabs.is_empty() {
            state.window_open = false;
            state.selected = 0;
            info!("last tab closed, window closed");
        } else {
            state.selected = index.saturating_sub(1).min(state.tabs.len() - 1);
        }
        Ok(())
    }

    async fn remove_all_tabs_but(&self, keep: TabId) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        state.tab(keep)?;

        let removed: Vec<TabId> = state
            .tabs
            .iter()
            .map(|t| t.id)
            .filter(|id| *id != keep)
            .collect();
        state.tabs.retain(|t| t.id == keep);
        for id in &removed {
            state.forget_tab(*id);
        }
        state.selected = 0;
        debug!(kept = %keep, removed = removed.len(), "closed all other tabs");
        Ok(())
    }

    fn load_events(&self) -> broadcast::Receiver<LoadEvent> {
        self.inner.load_tx.subscribe()
    }
}

impl ContentAccess for SimBrowser {
    async fn find_element(&self, tab: TabId, element_id: &str) -> Result<ElementRef, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        let doc = state.document(tab)?;
        if doc.element(element_id).is_none() {
            return Err(HostError::ElementNotFound {
                tab,
                element_id: element_id.to_owned(),
            });
        }
        Ok(ElementRef::new(tab, element_id))
    }

    async fn element_text(
        &self,
        tab: TabId,
        element_id: &str,
    ) -> Result<Option<String>, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        let current = state.tab(tab)?;
        Ok(current
            .document
            .as_ref()
            .and_then(|d| d.text(element_id))
            .map(str::to_owned))
    }

    async fn document_url(&self, tab: TabId) -> Result<Url, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        Ok(state.document(tab)?.url.clone())
    }

    async fn append_link(&self, tab: TabId, link: &LinkTarget) -> Result<ElementRef, HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let doc = state
            .tab_mut(tab)?
            .document
            .as_mut()
            .ok_or(HostError::NoDocument(tab))?;
        doc.append_link(&link.element_id, link.href.clone());
        debug!(tab = %tab, link = %link.element_id, href = %link.href, "link appended");
        Ok(ElementRef::new(tab, link.element_id.clone()))
    }
}

impl PromptRegistry for SimBrowser {
    async fn prompt(
        &self,
        kind: PromptKind,
        tab: TabId,
    ) -> Result<Option<PromptHandle>, HostError> {
        let state = self.inner.state.lock().await;
        state.ensure_open()?;
        state.tab(tab)?;
        Ok(state
            .prompts
            .get(&(tab, kind))
            .map(|entry| PromptHandle::new(kind, tab, entry.generation, entry.actions.clone())))
    }

    async fn invoke_prompt_action(
        &self,
        handle: PromptHandle,
        index: usize,
    ) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let key = (handle.tab(), handle.kind());
        let entry = state
            .prompts
            .get(&key)
            .filter(|e| e.generation == handle.generation())
            .ok_or(HostError::StalePrompt {
                kind: handle.kind(),
                tab: handle.tab(),
            })?;
        let action = entry
            .actions
            .get(index)
            .ok_or(HostError::ActionOutOfRange {
                index,
                available: entry.actions.len(),
            })?
            .kind;

        match action {
            PromptActionKind::DisableProtection => {
                state.prompts.remove(&key);
                let tab = state.tab_mut(handle.tab())?;
                let doc_url = tab
                    .document
                    .as_ref()
                    .map(|d| d.url.clone())
                    .ok_or(HostError::NoDocument(handle.tab()))?;
                tab.override_origin = Origin::of(&doc_url);
                info!(
                    tab = %handle.tab(),
                    origin = ?tab.override_origin,
                    "protection disabled, reloading"
                );
                let kind = NavigationKind::OverrideReload;
                self.start_navigation(&mut state, handle.tab(), doc_url, kind)
            }
        }
    }
}

impl GestureRouting for SimBrowser {
    async fn intercept_next_click(&self) -> Result<oneshot::Receiver<ClickEvent>, HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let (tx, rx) = oneshot::channel();
        if state
            .click_interceptor
            .replace(tx)
            .is_some_and(|old| !old.is_closed())
        {
            warn!("replacing an armed click interception");
        }
        Ok(rx)
    }

    async fn synthesize_mouse_at_center(
        &self,
        target: &ElementRef,
        init: MouseEventInit,
    ) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let href = state.link_href(target)?;

        match init.kind {
            MouseEventKind::ContextMenu => {
                state.popup_target = Some(target.clone());
                debug!(target = %target, "context menu shown");
                let _ = self.inner.popup_tx.send(PopupEvent::Shown {
                    target: target.clone(),
                });
                Ok(())
            }
            MouseEventKind::Click => {
                let href = href.ok_or_else(|| HostError::NotALink {
                    element_id: target.element_id.clone(),
                })?;
                let event = ClickEvent {
                    source: target.clone(),
                    href,
                    button: init.button,
                    accel: init.accel,
                };
                // 가로채기는 전달 전에 해제됨
                if let Some(interceptor) = state.click_interceptor.take() {
                    match interceptor.send(event) {
                        Ok(()) => return Ok(()),
                        Err(event) => {
                            warn!("click interception receiver dropped, using default routing");
                            return self.route_click(&mut state, event);
                        }
                    }
                }
                self.route_click(&mut state, event)
            }
        }
    }

    async fn route_content_click(&self, event: ClickEvent) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        self.route_click(&mut state, event)
    }

    fn popup_events(&self) -> broadcast::Receiver<PopupEvent> {
        self.inner.popup_tx.subscribe()
    }

    async fn do_menu_command(&self, command: MenuCommand) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        state.ensure_open()?;
        let target = state.popup_target.clone().ok_or(HostError::PopupNotOpen)?;

        match command {
            MenuCommand::OpenLinkInTab => {
                let href = state.link_href(&target)?.ok_or_else(|| HostError::NotALink {
                    element_id: target.element_id.clone(),
                })?;
                debug!(command = command.as_str(), target = %target, "menu command");
                self.open_link_in_new_tab(&mut state, target.tab, href)?;
                Ok(())
            }
        }
    }

    async fn hide_popup(&self) -> Result<(), HostError> {
        let mut state = self.inner.state.lock().await;
        if state.popup_target.take().is_some() {
            let _ = self.inner.popup_tx.send(PopupEvent::Hidden);
        }
        Ok(())
    }
}

impl Preferences for SimBrowser {
    async fn bool_pref(&self, name: &str) -> Result<Option<bool>, HostError> {
        if !self.inner.known_prefs.contains(name) {
            return Err(HostError::UnknownPref(name.to_owned()));
        }
        let state = self.inner.state.lock().await;
        Ok(state.prefs.get(name).copied())
    }

    async fn set_bool_pref(&self, name: &str, value: bool) -> Result<(), HostError> {
        if !self.inner.known_prefs.contains(name) {
            return Err(HostError::UnknownPref(name.to_owned()));
        }
        let mut state = self.inner.state.lock().await;
        state.prefs.insert(name.to_owned(), value);
        debug!(pref = name, value, "preference set");
        Ok(())
    }

    async fn clear_pref(&self, name: &str) -> Result<(), HostError> {
        if !self.inner.known_prefs.contains(name) {
            return Err(HostError::UnknownPref(name.to_owned()));
        }
        let mut state = self.inner.state.lock().await;
        state.prefs.remove(name);
        debug!(pref = name, "preference cleared");
        Ok(())
    }
}
