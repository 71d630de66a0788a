//! Fault-injecting host wrapper.
//!
//! Delegates every capability to a [`SimBrowser`] except for the faults it is
//! configured with.

use std::sync::atomic::{AtomicUsize, Ordering};

use mixguard_core::config::HostConfig;
use mixguard_core::error::HostError;
use mixguard_core::host::{ContentAccess, GestureRouting, Preferences, PromptRegistry, TabStrip};
use mixguard_core::types::{
    ClickEvent, ElementRef, LinkTarget, LoadEvent, MenuCommand, MouseEventInit, MouseEventKind,
    PopupEvent, PromptHandle, PromptKind, TabId,
};
use mixguard_sim_browser::SimBrowser;
use tokio::sync::{broadcast, oneshot};
use url::Url;

pub struct FaultyHost {
    inner: SimBrowser,
    /// Link id silently dropped by `append_link`.
    missing_link: Option<String>,
    /// Synthetic clicks are swallowed before reaching click routing.
    swallow_clicks: bool,
    /// Zero-based `invoke_prompt_action` call that reports a stale prompt.
    stale_prompt_at: Option<usize>,
    prompt_actions: AtomicUsize,
    /// Zero-based `remove_all_tabs_but` call that reports a missing tab.
    lost_tab_at: Option<usize>,
    tab_resets: AtomicUsize,
    /// Open tab count at every synthesized mouse event.
    /// Protected by tokio::sync::Mutex.
    gesture_tab_counts: tokio::sync::Mutex<Vec<usize>>,
}

#[allow(dead_code)]
impl FaultyHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            inner: SimBrowser::new(config),
            missing_link: None,
            swallow_clicks: false,
            stale_prompt_at: None,
            prompt_actions: AtomicUsize::new(0),
            lost_tab_at: None,
            tab_resets: AtomicUsize::new(0),
            gesture_tab_counts: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn missing_link(mut self, element_id: &str) -> Self {
        self.missing_link = Some(element_id.to_owned());
        self
    }

    pub fn swallow_clicks(mut self) -> Self {
        self.swallow_clicks = true;
        self
    }

    pub fn stale_prompt_at(mut self, call: usize) -> Self {
        self.stale_prompt_at = Some(call);
        self
    }

    pub fn lost_tab_at(mut self, call: usize) -> Self {
        self.lost_tab_at = Some(call);
        self
    }

    pub async fn gesture_tab_counts(&self) -> Vec<usize> {
        self.gesture_tab_counts.lock().await.clone()
    }

    pub fn inner(&self) -> &SimBrowser {
        &self.inner
    }
}

impl TabStrip for FaultyHost {
    async fn open_window(&self) -> Result<TabId, HostError> {
        self.inner.open_window().await
    }

    async fn close_window(&self) -> Result<(), HostError> {
        self.inner.close_window().await
    }

    async fn tabs(&self) -> Result<Vec<TabId>, HostError> {
        self.inner.tabs().await
    }

    async fn selected_tab(&self) -> Result<TabId, HostError> {
        self.inner.selected_tab().await
    }

    async fn select_tab_at(&self, index: usize) -> Result<TabId, HostError> {
        self.inner.select_tab_at(index).await
    }

    async fn select_tab(&self, tab: TabId) -> Result<(), HostError> {
        self.inner.select_tab(tab).await
    }

    async fn add_tab(&self, url: &Url) -> Result<TabId, HostError> {
        self.inner.add_tab(url).await
    }

    async fn remove_current_tab(&self) -> Result<(), HostError> {
        self.inner.remove_current_tab().await
    }

    async fn remove_all_tabs_but(&self, keep: TabId) -> Result<(), HostError> {
        let call = self.tab_resets.fetch_add(1, Ordering::SeqCst);
        if self.lost_tab_at == Some(call) {
            return Err(HostError::TabNotFound(keep));
        }
        self.inner.remove_all_tabs_but(keep).await
    }

    fn load_events(&self) -> broadcast::Receiver<LoadEvent> {
        self.inner.load_events()
    }
}

impl ContentAccess for FaultyHost {
    async fn find_element(&self, tab: TabId, element_id: &str) -> Result<ElementRef, HostError> {
        self.inner.find_element(tab, element_id).await
    }

    async fn element_text(
        &self,
        tab: TabId,
        element_id: &str,
    ) -> Result<Option<String>, HostError> {
        self.inner.element_text(tab, element_id).await
    }

    async fn document_url(&self, tab: TabId) -> Result<Url, HostError> {
        self.inner.document_url(tab).await
    }

    async fn append_link(&self, tab: TabId, link: &LinkTarget) -> Result<ElementRef, HostError> {
        if self.missing_link.as_deref() == Some(link.element_id.as_str()) {
            return Ok(ElementRef::new(tab, link.element_id.clone()));
        }
        self.inner.append_link(tab, link).await
    }
}

impl PromptRegistry for FaultyHost {
    async fn prompt(
        &self,
        kind: PromptKind,
        tab: TabId,
    ) -> Result<Option<PromptHandle>, HostError> {
        self.inner.prompt(kind, tab).await
    }

    async fn invoke_prompt_action(
        &self,
        handle: PromptHandle,
        index: usize,
    ) -> Result<(), HostError> {
        let call = self.prompt_actions.fetch_add(1, Ordering::SeqCst);
        if self.stale_prompt_at == Some(call) {
            return Err(HostError::StalePrompt {
                kind: handle.kind(),
                tab: handle.tab(),
            });
        }
        self.inner.invoke_prompt_action(handle, index).await
    }
}

impl GestureRouting for FaultyHost {
    async fn intercept_next_click(&self) -> Result<oneshot::Receiver<ClickEvent>, HostError> {
        self.inner.intercept_next_click().await
    }

    async fn synthesize_mouse_at_center(
        &self,
        target: &ElementRef,
        init: MouseEventInit,
    ) -> Result<(), HostError> {
        let open = self.inner.tabs().await?.len();
        self.gesture_tab_counts.lock().await.push(open);
        if self.swallow_clicks && init.kind == MouseEventKind::Click {
            return Ok(());
        }
        self.inner.synthesize_mouse_at_center(target, init).await
    }

    async fn route_content_click(&self, event: ClickEvent) -> Result<(), HostError> {
        self.inner.route_content_click(event).await
    }

    fn popup_events(&self) -> broadcast::Receiver<PopupEvent> {
        self.inner.popup_events()
    }

    async fn do_menu_command(&self, command: MenuCommand) -> Result<(), HostError> {
        self.inner.do_menu_command(command).await
    }

    async fn hide_popup(&self) -> Result<(), HostError> {
        self.inner.hide_popup().await
    }
}

impl Preferences for FaultyHost {
    async fn bool_pref(&self, name: &str) -> Result<Option<bool>, HostError> {
        self.inner.bool_pref(name).await
    }

    async fn set_bool_pref(&self, name: &str, value: bool) -> Result<(), HostError> {
        self.inner.set_bool_pref(name, value).await
    }

    async fn clear_pref(&self, name: &str) -> Result<(), HostError> {
        self.inner.clear_pref(name).await
    }
}
