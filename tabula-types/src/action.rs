//! Action types for the dispatch system.
//!
//! Actions are the wire format between the UI collaborators and the core.
//! A CRUD intent (`Action::Crud`) is picked up by the fetch engine, which
//! answers with the lifecycle variants (`CrudLoading`, `CrudSuccess`,
//! `CrudFailure`) carrying the original request unchanged.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{Filter, Pagination, Params, ProviderError, ProviderResponse, Record, RecordId, Sort, Verb};

// ============================================================================
// Request identity
// ============================================================================

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one dispatched intent. Every lifecycle action
/// produced for an intent carries the same id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn next() -> Self {
        Self(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed))
    }

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Side-effect payloads
// ============================================================================

/// Where to navigate after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectTo {
    List,
    Edit,
    Show,
    Create,
    None,
}

impl RedirectTo {
    /// Resolve against a base path (e.g. `/posts`) and the affected record id.
    /// Id-bearing targets without an id fall back to the list.
    pub fn resolve(&self, base_path: &str, id: Option<&RecordId>) -> Option<String> {
        match (self, id) {
            (RedirectTo::None, _) => None,
            (RedirectTo::List, _) | (RedirectTo::Edit | RedirectTo::Show, None) => {
                Some(base_path.to_string())
            }
            (RedirectTo::Create, _) => Some(format!("{}/create", base_path)),
            (RedirectTo::Edit, Some(id)) => Some(format!("{}/{}", base_path, id)),
            (RedirectTo::Show, Some(id)) => Some(format!("{}/{}/show", base_path, id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Warning,
}

/// Transient snackbar-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    /// True when the message offers an "Undo" affordance.
    pub undoable: bool,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NotificationKind::Info, undoable: false }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NotificationKind::Warning, undoable: false }
    }

    pub fn undoable(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NotificationKind::Info, undoable: true }
    }
}

// ============================================================================
// CRUD intents
// ============================================================================

/// The CRUD intent kinds. `GetMatching` is sent to the provider as GET_LIST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrudKind {
    GetList,
    GetOne,
    GetMany,
    GetMatching,
    GetManyReference,
    Create,
    Update,
    Delete,
}

impl CrudKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrudKind::GetList => "CRUD_GET_LIST",
            CrudKind::GetOne => "CRUD_GET_ONE",
            CrudKind::GetMany => "CRUD_GET_MANY",
            CrudKind::GetMatching => "CRUD_GET_MATCHING",
            CrudKind::GetManyReference => "CRUD_GET_MANY_REFERENCE",
            CrudKind::Create => "CRUD_CREATE",
            CrudKind::Update => "CRUD_UPDATE",
            CrudKind::Delete => "CRUD_DELETE",
        }
    }

    pub fn verb(&self) -> Verb {
        match self {
            CrudKind::GetList | CrudKind::GetMatching => Verb::GetList,
            CrudKind::GetOne => Verb::GetOne,
            CrudKind::GetMany => Verb::GetMany,
            CrudKind::GetManyReference => Verb::GetManyReference,
            CrudKind::Create => Verb::Create,
            CrudKind::Update => Verb::Update,
            CrudKind::Delete => Verb::Delete,
        }
    }
}

/// What the caller wants done, with the verb-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrudIntent {
    GetList {
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
    },
    GetOne {
        id: RecordId,
        base_path: Option<String>,
    },
    GetMany {
        ids: Vec<RecordId>,
    },
    /// Candidate records for a reference input; `related_to` keys the result.
    GetMatching {
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
        related_to: String,
    },
    /// Records whose `target` field equals `id`; `related_to` keys the result.
    GetManyReference {
        target: String,
        id: RecordId,
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
        related_to: String,
    },
    Create {
        data: Record,
        base_path: Option<String>,
        redirect_to: RedirectTo,
    },
    Update {
        id: RecordId,
        data: Record,
        previous_data: Option<Record>,
        base_path: Option<String>,
        redirect_to: RedirectTo,
    },
    Delete {
        id: RecordId,
        previous_data: Option<Record>,
        base_path: Option<String>,
        redirect_to: RedirectTo,
    },
}

impl CrudIntent {
    pub fn kind(&self) -> CrudKind {
        match self {
            CrudIntent::GetList { .. } => CrudKind::GetList,
            CrudIntent::GetOne { .. } => CrudKind::GetOne,
            CrudIntent::GetMany { .. } => CrudKind::GetMany,
            CrudIntent::GetMatching { .. } => CrudKind::GetMatching,
            CrudIntent::GetManyReference { .. } => CrudKind::GetManyReference,
            CrudIntent::Create { .. } => CrudKind::Create,
            CrudIntent::Update { .. } => CrudKind::Update,
            CrudIntent::Delete { .. } => CrudKind::Delete,
        }
    }

    /// Translate the intent into provider params.
    pub fn params(&self) -> Params {
        match self {
            CrudIntent::GetList { pagination, sort, filter }
            | CrudIntent::GetMatching { pagination, sort, filter, .. } => Params::GetList {
                pagination: *pagination,
                sort: sort.clone(),
                filter: filter.clone(),
            },
            CrudIntent::GetOne { id, .. } => Params::GetOne { id: id.clone() },
            CrudIntent::GetMany { ids } => Params::GetMany { ids: ids.clone() },
            CrudIntent::GetManyReference { target, id, pagination, sort, filter, .. } => {
                Params::GetManyReference {
                    target: target.clone(),
                    id: id.clone(),
                    pagination: *pagination,
                    sort: sort.clone(),
                    filter: filter.clone(),
                }
            }
            CrudIntent::Create { data, .. } => Params::Create { data: data.clone() },
            CrudIntent::Update { id, data, previous_data, .. } => Params::Update {
                id: id.clone(),
                data: data.clone(),
                previous_data: previous_data.clone(),
            },
            CrudIntent::Delete { id, previous_data, .. } => Params::Delete {
                id: id.clone(),
                previous_data: previous_data.clone(),
            },
        }
    }

    pub fn base_path(&self) -> Option<&str> {
        match self {
            CrudIntent::GetOne { base_path, .. }
            | CrudIntent::Create { base_path, .. }
            | CrudIntent::Update { base_path, .. }
            | CrudIntent::Delete { base_path, .. } => base_path.as_deref(),
            _ => None,
        }
    }
}

/// Routing metadata shared by an intent and all of its lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub resource: String,
    /// A newer cancel-previous intent supersedes this one while in flight.
    pub cancel_previous: bool,
    pub request: RequestId,
    /// Set on the network dispatch that follows an undoable gate; its
    /// success notification was already shown when the gate opened.
    #[serde(default)]
    pub undoable: bool,
}

/// A CRUD intent addressed to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrudAction {
    pub intent: CrudIntent,
    pub meta: Meta,
}

impl CrudAction {
    fn new(resource: impl Into<String>, intent: CrudIntent, cancel_previous: bool) -> Self {
        Self {
            intent,
            meta: Meta {
                resource: resource.into(),
                cancel_previous,
                request: RequestId::next(),
                undoable: false,
            },
        }
    }

    pub fn get_list(resource: impl Into<String>, pagination: Pagination, sort: Sort, filter: Filter) -> Self {
        Self::new(resource, CrudIntent::GetList { pagination, sort, filter }, true)
    }

    pub fn get_one(resource: impl Into<String>, id: impl Into<RecordId>, base_path: Option<&str>) -> Self {
        let intent = CrudIntent::GetOne { id: id.into(), base_path: base_path.map(str::to_string) };
        Self::new(resource, intent, true)
    }

    pub fn get_many(resource: impl Into<String>, ids: Vec<RecordId>) -> Self {
        Self::new(resource, CrudIntent::GetMany { ids }, false)
    }

    pub fn get_matching(
        reference: impl Into<String>,
        related_to: impl Into<String>,
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
    ) -> Self {
        let intent = CrudIntent::GetMatching { pagination, sort, filter, related_to: related_to.into() };
        Self::new(reference, intent, false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_many_reference(
        reference: impl Into<String>,
        target: impl Into<String>,
        id: impl Into<RecordId>,
        related_to: impl Into<String>,
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
    ) -> Self {
        let intent = CrudIntent::GetManyReference {
            target: target.into(),
            id: id.into(),
            pagination,
            sort,
            filter,
            related_to: related_to.into(),
        };
        Self::new(reference, intent, false)
    }

    pub fn create(resource: impl Into<String>, data: Record, base_path: Option<&str>) -> Self {
        let intent = CrudIntent::Create {
            data,
            base_path: base_path.map(str::to_string),
            redirect_to: RedirectTo::Edit,
        };
        Self::new(resource, intent, false)
    }

    pub fn update(
        resource: impl Into<String>,
        id: impl Into<RecordId>,
        data: Record,
        previous_data: Option<Record>,
        base_path: Option<&str>,
    ) -> Self {
        let intent = CrudIntent::Update {
            id: id.into(),
            data,
            previous_data,
            base_path: base_path.map(str::to_string),
            redirect_to: RedirectTo::List,
        };
        Self::new(resource, intent, false)
    }

    pub fn delete(
        resource: impl Into<String>,
        id: impl Into<RecordId>,
        previous_data: Option<Record>,
        base_path: Option<&str>,
    ) -> Self {
        let intent = CrudIntent::Delete {
            id: id.into(),
            previous_data,
            base_path: base_path.map(str::to_string),
            redirect_to: RedirectTo::List,
        };
        Self::new(resource, intent, false)
    }

    /// Override where a successful write navigates. No-op for reads.
    pub fn with_redirect(mut self, target: RedirectTo) -> Self {
        match &mut self.intent {
            CrudIntent::Create { redirect_to, .. }
            | CrudIntent::Update { redirect_to, .. }
            | CrudIntent::Delete { redirect_to, .. } => *redirect_to = target,
            _ => {}
        }
        self
    }

    pub fn with_cancel_previous(mut self, cancel_previous: bool) -> Self {
        self.meta.cancel_previous = cancel_previous;
        self
    }

    pub fn resource(&self) -> &str {
        &self.meta.resource
    }

    pub fn request(&self) -> RequestId {
        self.meta.request
    }

    pub fn kind(&self) -> CrudKind {
        self.intent.kind()
    }
}

// ============================================================================
// List navigation
// ============================================================================

/// Pagination / sort / filter operations on a resource's query params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListParamsOp {
    NextPage,
    PrevPage,
    GotoPage(u32),
    /// Sort by `field`; toggles the order when already sorted by it.
    SetSort(String),
    SetPerPage(u32),
    SetFilter(Filter),
}

impl ListParamsOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListParamsOp::NextPage => "NEXT_PAGE",
            ListParamsOp::PrevPage => "PREV_PAGE",
            ListParamsOp::GotoPage(_) => "GOTO_PAGE",
            ListParamsOp::SetSort(_) => "SET_SORT",
            ListParamsOp::SetPerPage(_) => "SET_PER_PAGE",
            ListParamsOp::SetFilter(_) => "SET_FILTER",
        }
    }
}

// ============================================================================
// Action
// ============================================================================

/// Everything that flows through `Store::dispatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A CRUD intent, picked up by the fetch engine.
    Crud(CrudAction),
    CrudLoading(CrudAction),
    CrudSuccess(CrudAction, ProviderResponse),
    CrudFailure(CrudAction, ProviderError),
    /// Local application of a write before the server confirms it.
    Optimistic(CrudAction),
    /// Open an undo window in front of the intent.
    StartUndoable(CrudAction),
    /// Abandon an undoable intent before its network call.
    Undo(RequestId),
    /// Close an undo window and issue the network call.
    CompleteUndoable(RequestId),
    FetchStart(RequestId),
    FetchEnd(RequestId),
    FetchError(RequestId),
    FetchCancel(RequestId),
    /// Ask for records by id; coalesced with other lookups for the resource.
    FetchReference { resource: String, ids: Vec<RecordId> },
    ListParams { resource: String, op: ListParamsOp },
    ShowNotification(Notification),
    HideNotification,
    Navigate(String),
    RefreshView,
}

impl Action {
    /// Redux-style type name, e.g. `CRUD_GET_LIST_SUCCESS`. Used for logging.
    pub fn type_name(&self) -> String {
        match self {
            Action::Crud(a) => a.kind().as_str().to_string(),
            Action::CrudLoading(a) => format!("{}_LOADING", a.kind().as_str()),
            Action::CrudSuccess(a, _) => format!("{}_SUCCESS", a.kind().as_str()),
            Action::CrudFailure(a, _) => format!("{}_FAILURE", a.kind().as_str()),
            Action::Optimistic(a) => format!("{}_OPTIMISTIC", a.kind().as_str()),
            Action::StartUndoable(_) => "UNDOABLE".to_string(),
            Action::Undo(_) => "UNDO".to_string(),
            Action::CompleteUndoable(_) => "COMPLETE".to_string(),
            Action::FetchStart(_) => "FETCH_START".to_string(),
            Action::FetchEnd(_) => "FETCH_END".to_string(),
            Action::FetchError(_) => "FETCH_ERROR".to_string(),
            Action::FetchCancel(_) => "FETCH_CANCEL".to_string(),
            Action::FetchReference { .. } => "CRUD_GET_MANY_ACCUMULATE".to_string(),
            Action::ListParams { op, .. } => op.as_str().to_string(),
            Action::ShowNotification(_) => "SHOW_NOTIFICATION".to_string(),
            Action::HideNotification => "HIDE_NOTIFICATION".to_string(),
            Action::Navigate(_) => "NAVIGATE".to_string(),
            Action::RefreshView => "REFRESH_VIEW".to_string(),
        }
    }

    /// The request this action belongs to, if it is part of a fetch lifecycle.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Action::Crud(a)
            | Action::CrudLoading(a)
            | Action::CrudSuccess(a, _)
            | Action::CrudFailure(a, _)
            | Action::Optimistic(a)
            | Action::StartUndoable(a) => Some(a.request()),
            Action::Undo(id)
            | Action::CompleteUndoable(id)
            | Action::FetchStart(id)
            | Action::FetchEnd(id)
            | Action::FetchError(id)
            | Action::FetchCancel(id) => Some(*id),
            Action::FetchReference { .. }
            | Action::ListParams { .. }
            | Action::ShowNotification(_)
            | Action::HideNotification
            | Action::Navigate(_)
            | Action::RefreshView => None,
        }
    }
}
