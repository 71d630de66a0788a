//! Host application capability traits.
//!
//! The scenario engine never talks to a concrete browser. Everything it needs
//! from the system under test goes through the traits below, so the engine can
//! run against the in-process simulated browser or any other implementation.
//!
//! ```text
//! ┌────────────────┐
//! │ ScenarioRunner │
//! └───────┬────────┘
//!         │
//!         ▼
//!   ┌─────────────┐
//!   │ BrowserHost │ (TabStrip + ContentAccess + PromptRegistry
//!   └─────────────┘  + GestureRouting + Preferences)
//!        │     │
//!        ▼     ▼
//!   ┌───────┐ ┌──────┐
//!   │  Sim  │ │ Mock │
//!   └───────┘ └──────┘
//! ```
//!
//! All traits are `Send + Sync + 'static` and their async methods return
//! `Send` futures.
//!
//! # Signals
//!
//! Load completions and context-menu popup changes are delivered through
//! `tokio::sync::broadcast` subscriptions. A caller subscribes *before* it
//! performs the action that will fire the signal; dropping the receiver
//! removes the listener.

use std::future::Future;

use tokio::sync::{broadcast, oneshot};
use url::Url;

use crate::error::HostError;
use crate::types::{
    ClickEvent, ElementRef, LinkTarget, LoadEvent, MenuCommand, MouseEventInit, PopupEvent,
    PromptHandle, PromptKind, TabId,
};

/// Window and tab lifecycle.
pub trait TabStrip: Send + Sync + 'static {
    /// Opens the test window with a single blank tab and returns that tab.
    fn open_window(&self) -> impl Future<Output = Result<TabId, HostError>> + Send;

    /// Closes the test window and every tab in it.
    fn close_window(&self) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Tabs in strip order.
    fn tabs(&self) -> impl Future<Output = Result<Vec<TabId>, HostError>> + Send;

    fn selected_tab(&self) -> impl Future<Output = Result<TabId, HostError>> + Send;

    /// Selects the tab at `index` in strip order.
    ///
    /// # Errors
    ///
    /// `HostError::TabIndexOutOfRange` when the strip is shorter than `index + 1`.
    fn select_tab_at(&self, index: usize)
    -> impl Future<Output = Result<TabId, HostError>> + Send;

    fn select_tab(&self, tab: TabId) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Appends a new tab and starts loading `url` in it. The tab does not
    /// inherit any state from the currently selected tab.
    fn add_tab(&self, url: &Url) -> impl Future<Output = Result<TabId, HostError>> + Send;

    /// Closes the selected tab; selection moves to a neighbouring tab.
    fn remove_current_tab(&self) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Closes every tab except `keep`.
    fn remove_all_tabs_but(&self, keep: TabId)
    -> impl Future<Output = Result<(), HostError>> + Send;

    /// Subscribes to load completions. One event fires per navigation hop,
    /// redirects included.
    fn load_events(&self) -> broadcast::Receiver<LoadEvent>;
}

/// Read and mutate loaded content.
pub trait ContentAccess: Send + Sync + 'static {
    /// Resolves an element by id in the tab's current document.
    ///
    /// # Errors
    ///
    /// - `HostError::NoDocument`: nothing is loaded in the tab
    /// - `HostError::ElementNotFound`: the document has no such element
    fn find_element(
        &self,
        tab: TabId,
        element_id: &str,
    ) -> impl Future<Output = Result<ElementRef, HostError>> + Send;

    /// Text content of an element, or `None` if it does not exist (yet).
    fn element_text(
        &self,
        tab: TabId,
        element_id: &str,
    ) -> impl Future<Output = Result<Option<String>, HostError>> + Send;

    /// URL of the tab's current document.
    fn document_url(&self, tab: TabId) -> impl Future<Output = Result<Url, HostError>> + Send;

    /// Appends an anchor element to the tab's current document.
    fn append_link(
        &self,
        tab: TabId,
        link: &LinkTarget,
    ) -> impl Future<Output = Result<ElementRef, HostError>> + Send;
}

/// Transient notification prompts keyed by (kind, tab).
pub trait PromptRegistry: Send + Sync + 'static {
    /// Single lookup. `None` is a valid answer, not an error.
    fn prompt(
        &self,
        kind: PromptKind,
        tab: TabId,
    ) -> impl Future<Output = Result<Option<PromptHandle>, HostError>> + Send;

    /// Invokes the action at `index` on the prompt the handle was taken from.
    ///
    /// # Errors
    ///
    /// - `HostError::StalePrompt`: the prompt was removed or re-created
    /// - `HostError::ActionOutOfRange`: `index` is past the action list
    fn invoke_prompt_action(
        &self,
        handle: PromptHandle,
        index: usize,
    ) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Input routing: click interception and the content context menu.
pub trait GestureRouting: Send + Sync + 'static {
    /// Arms a one-shot interception of the next content click. The click is
    /// delivered to the returned receiver instead of the default routing, and
    /// the interception disarms itself before delivery. Dropping the receiver
    /// disarms it too; the next click then takes the default routing.
    fn intercept_next_click(
        &self,
    ) -> impl Future<Output = Result<oneshot::Receiver<ClickEvent>, HostError>> + Send;

    /// Dispatches a synthetic mouse event at the centre of `target`.
    fn synthesize_mouse_at_center(
        &self,
        target: &ElementRef,
        init: MouseEventInit,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Default content-area click handling: modified clicks open the link in a
    /// new background tab, plain clicks navigate in place.
    fn route_content_click(
        &self,
        event: ClickEvent,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Subscribes to context-menu popup changes.
    fn popup_events(&self) -> broadcast::Receiver<PopupEvent>;

    /// Runs a command on the open context menu.
    fn do_menu_command(
        &self,
        command: MenuCommand,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    fn hide_popup(&self) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Boolean preference storage.
pub trait Preferences: Send + Sync + 'static {
    /// Current value, `None` when the preference has no user value.
    fn bool_pref(&self, name: &str)
    -> impl Future<Output = Result<Option<bool>, HostError>> + Send;

    fn set_bool_pref(
        &self,
        name: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    fn clear_pref(&self, name: &str) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Full capability set the scenario engine drives.
pub trait BrowserHost: TabStrip + ContentAccess + PromptRegistry + GestureRouting + Preferences {}

impl<T> BrowserHost for T where
    T: TabStrip + ContentAccess + PromptRegistry + GestureRouting + Preferences
{
}
