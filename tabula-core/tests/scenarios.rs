mod common;

use common::*;
use serde_json::json;
use tabula_core::provider::MemoryProvider;
use tabula_core::{
    Action, CoreError, CrudAction, Filter, ListParamsOp, MutationMode, Notification, Pagination, ReduceError,
    Record, RecordId, Sort, SortOrder,
};

fn ids(raw: &[i64]) -> Vec<RecordId> {
    raw.iter().map(|i| RecordId::Int(*i)).collect()
}

#[tokio::test(start_paused = true)]
async fn create_post_notifies_and_opens_it() {
    let (store, _provider) = make_store();
    let mut events = store.subscribe();
    let data = Record::from_json(json!({"title": "A"})).unwrap();
    store.dispatch(Action::Crud(CrudAction::create("posts", data, Some("/posts")))).unwrap();
    settle().await;

    let actions = drain(&mut events);
    let after_success: Vec<_> = actions
        .iter()
        .skip_while(|a| !matches!(a, Action::CrudSuccess(..)))
        .skip(1)
        .cloned()
        .collect();
    assert_eq!(
        after_success,
        vec![
            Action::ShowNotification(Notification::info("Element created")),
            Action::Navigate("/posts/5".into()),
            Action::FetchEnd(actions[0].request().unwrap()),
        ]
    );
    let stored = store.read(|s| s.resource("posts").unwrap().data.get(&RecordId::Int(5)).cloned());
    assert_eq!(stored.map(Record::into_json), Some(json!({"id": 5, "title": "A"})));
}

#[tokio::test(start_paused = true)]
async fn delete_prunes_window_and_keeps_record() {
    let (store, _provider) = make_store();
    let list = CrudAction::get_list("posts", Pagination::new(1, 10), Sort::new("id", SortOrder::Asc), Filter::new());
    store.fetch(list).await.unwrap();
    assert_eq!(store.read(|s| s.resource("posts").unwrap().list.ids().to_vec()), ids(&[1, 2, 3, 4]));

    store.fetch(CrudAction::delete("posts", "3", None, Some("/posts"))).await.unwrap();
    let posts = store.read(|s| s.resource("posts").unwrap().clone());
    assert_eq!(posts.list.ids(), ids(&[1, 2, 4]).as_slice());
    assert!(posts.data.contains(&RecordId::Int(3)));
}

#[tokio::test(start_paused = true)]
async fn goto_page_past_the_last_page_is_rejected() {
    let memory = MemoryProvider::new().with_collection("posts", posts(25));
    let (store, _provider) = make_store_with(test_config(MutationMode::Pessimistic), memory);
    let list = CrudAction::get_list("posts", Pagination::new(1, 10), Sort::default(), Filter::new());
    store.fetch(list).await.unwrap();
    assert_eq!(store.read(|s| s.resource("posts").unwrap().params.max_page()), 3);

    let result = store.dispatch(Action::ListParams { resource: "posts".into(), op: ListParamsOp::GotoPage(6) });
    assert!(matches!(
        result,
        Err(CoreError::Reduce(ReduceError::PageOutOfBoundaries { page: 6, max: 3 }))
    ));
    assert_eq!(store.read(|s| s.resource("posts").unwrap().params.page), 1);

    store.dispatch(Action::ListParams { resource: "posts".into(), op: ListParamsOp::GotoPage(3) }).unwrap();
    assert_eq!(store.read(|s| s.resource("posts").unwrap().params.page), 3);
}

#[tokio::test(start_paused = true)]
async fn list_params_drive_the_next_request() {
    let memory = MemoryProvider::new().with_collection("posts", posts(25));
    let (store, _provider) = make_store_with(test_config(MutationMode::Pessimistic), memory);
    store
        .fetch(CrudAction::get_list("posts", Pagination::new(1, 10), Sort::default(), Filter::new()))
        .await
        .unwrap();
    store.dispatch(Action::ListParams { resource: "posts".into(), op: ListParamsOp::NextPage }).unwrap();
    store.dispatch(Action::ListParams { resource: "posts".into(), op: ListParamsOp::SetSort("id".into()) }).unwrap();

    let params = store.read(|s| s.resource("posts").unwrap().params.clone());
    assert_eq!(params.page, 1);
    assert_eq!(params.sort, Sort::new("id", SortOrder::Asc));

    let request = CrudAction::get_list("posts", params.pagination(), params.sort.clone(), params.filter.clone());
    let response = store.fetch(request).await.unwrap();
    assert_eq!(response.ids("id")[..3], ids(&[1, 2, 3])[..]);
}
