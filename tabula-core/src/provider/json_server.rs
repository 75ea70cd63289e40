//! json-server URL scheme.
//!
//! ```text
//! GET_LIST           GET    {api}/posts?title=x&_sort=title&_order=ASC&_start=0&_end=24
//! GET_ONE            GET    {api}/posts/123
//! GET_MANY           GET    {api}/posts?id=123&id=456
//! GET_MANY_REFERENCE GET    {api}/comments?post_id=1&_sort=id&_order=DESC&_start=0&_end=10
//! CREATE             POST   {api}/posts
//! UPDATE             PUT    {api}/posts/123
//! DELETE             DELETE {api}/posts/123
//! ```

use serde_json::Value;
use tabula_types::{
    Filter, Pagination, Params, ProviderError, ProviderResponse, Record, RecordId, ResponseData, Sort, Verb,
};
use url::{form_urlencoded, Url};

use super::rest::{HttpRequest, HttpResponse, Method, RestFlavor};

const TOTAL_HEADER: &str = "X-Total-Count";

pub struct JsonServerFlavor {
    api_url: String,
    identifier: String,
}

impl JsonServerFlavor {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { api_url, identifier: "id".to_string() }
    }

    /// Attribute the server uses as primary key (json-server: `id`).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    fn collection(&self, resource: &str) -> String {
        format!("{}/{}", self.api_url, resource)
    }

    /// `{api}/{resource}/{id}` with the id percent-encoded as one segment.
    fn member(&self, resource: &str, id: &RecordId) -> Result<String, ProviderError> {
        let collection = self.collection(resource);
        let mut url = Url::parse(&collection)
            .map_err(|e| ProviderError::new(format!("invalid api url {}: {}", collection, e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::new(format!("api url {} cannot take path segments", collection)))?
            .push(&id.to_string());
        Ok(url.into())
    }
}

impl RestFlavor for JsonServerFlavor {
    fn http_request_from_action(&self, _verb: Verb, resource: &str, params: &Params) -> Result<HttpRequest, ProviderError> {
        let request = match params {
            Params::GetList { pagination, sort, filter } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                append_filter(&mut query, filter);
                append_window(&mut query, pagination, sort);
                HttpRequest::get(format!("{}?{}", self.collection(resource), query.finish()))
            }
            Params::GetOne { id } => HttpRequest::get(self.member(resource, id)?),
            Params::GetMany { ids } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                for id in ids {
                    query.append_pair(&self.identifier, &id.to_string());
                }
                HttpRequest::get(format!("{}?{}", self.collection(resource), query.finish()))
            }
            Params::GetManyReference { target, id, pagination, sort, filter } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                append_filter(&mut query, filter);
                query.append_pair(target, &id.to_string());
                append_window(&mut query, pagination, sort);
                HttpRequest::get(format!("{}?{}", self.collection(resource), query.finish()))
            }
            Params::Create { data } => HttpRequest::get(self.collection(resource))
                .with_method(Method::Post)
                .with_body(data.clone().into_json()),
            Params::Update { id, data, .. } => HttpRequest::get(self.member(resource, id)?)
                .with_method(Method::Put)
                .with_body(data.clone().into_json()),
            Params::Delete { id, .. } => {
                HttpRequest::get(self.member(resource, id)?).with_method(Method::Delete)
            }
        };
        Ok(request)
    }

    fn success_payload_from_http_response(
        &self,
        response: HttpResponse,
        verb: Verb,
        _resource: &str,
        params: &Params,
    ) -> Result<ProviderResponse, ProviderError> {
        match verb {
            Verb::GetList | Verb::GetManyReference => {
                let total = parse_total(&response)?;
                Ok(ProviderResponse { data: ResponseData::Many(records(response.body)?), total: Some(total) })
            }
            Verb::GetMany => Ok(ProviderResponse::many(records(response.body)?)),
            Verb::Create => {
                // Echo the submitted data with the id the server assigned.
                let mut created = match params {
                    Params::Create { data } => data.clone(),
                    _ => Record::new(),
                };
                if let Some(id) = response.body.get(&self.identifier) {
                    created.insert(self.identifier.clone(), id.clone());
                }
                Ok(ProviderResponse::one(created))
            }
            Verb::GetOne | Verb::Update | Verb::Delete => Ok(ProviderResponse::one(record(response.body)?)),
        }
    }
}

fn append_filter(query: &mut form_urlencoded::Serializer<'_, String>, filter: &Filter) {
    for (key, value) in filter {
        match value {
            Value::String(s) => query.append_pair(key, s),
            Value::Null => query.append_pair(key, ""),
            other => query.append_pair(key, &other.to_string()),
        };
    }
}

fn append_window(query: &mut form_urlencoded::Serializer<'_, String>, pagination: &Pagination, sort: &Sort) {
    query
        .append_pair("_sort", &sort.field)
        .append_pair("_order", sort.order.as_str())
        .append_pair("_start", &pagination.start().to_string())
        .append_pair("_end", &pagination.end().to_string());
}

/// `X-Total-Count` may be a plain count or a `range/total` form; the last
/// segment wins.
fn parse_total(response: &HttpResponse) -> Result<u64, ProviderError> {
    let header = response.header(TOTAL_HEADER).ok_or_else(|| {
        ProviderError::new(
            "The X-Total-Count header is missing in the HTTP Response. List responses must carry it \
             (declare it in Access-Control-Expose-Headers when using CORS).",
        )
    })?;
    let last = header.rsplit('/').next().unwrap_or(header).trim();
    last.parse::<u64>()
        .map_err(|_| ProviderError::new(format!("invalid X-Total-Count header: {}", header)))
}

fn records(body: Value) -> Result<Vec<Record>, ProviderError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| Record::from_json(item).ok_or_else(|| ProviderError::new("list item is not an object")))
            .collect(),
        _ => Err(ProviderError::new("expected a JSON array")),
    }
}

fn record(body: Value) -> Result<Record, ProviderError> {
    match body {
        // json-server answers DELETE with `{}`.
        Value::Null => Ok(Record::new()),
        other => Record::from_json(other).ok_or_else(|| ProviderError::new("expected a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabula_types::SortOrder;

    fn flavor() -> JsonServerFlavor {
        JsonServerFlavor::new("http://api.test/")
    }

    fn filter(value: Value) -> Filter {
        match value {
            Value::Object(map) => map,
            _ => Filter::new(),
        }
    }

    #[test]
    fn get_list_url() {
        let params = Params::GetList {
            pagination: Pagination::new(2, 24),
            sort: Sort::new("title", SortOrder::Asc),
            filter: filter(json!({"q": "hello world"})),
        };
        let request = flavor().http_request_from_action(Verb::GetList, "posts", &params).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "http://api.test/posts?q=hello+world&_sort=title&_order=ASC&_start=24&_end=48"
        );
    }

    #[test]
    fn get_many_uses_repeated_ids() {
        let params = Params::GetMany { ids: vec![RecordId::Int(1), RecordId::from("a")] };
        let request = flavor().http_request_from_action(Verb::GetMany, "tags", &params).unwrap();
        assert_eq!(request.url, "http://api.test/tags?id=1&id=a");
    }

    #[test]
    fn get_many_reference_filters_on_target() {
        let params = Params::GetManyReference {
            target: "post_id".into(),
            id: RecordId::Int(7),
            pagination: Pagination::default(),
            sort: Sort::default(),
            filter: Filter::new(),
        };
        let request = flavor().http_request_from_action(Verb::GetManyReference, "comments", &params).unwrap();
        assert_eq!(
            request.url,
            "http://api.test/comments?post_id=7&_sort=id&_order=DESC&_start=0&_end=10"
        );
    }

    #[test]
    fn writes_carry_method_and_body() {
        let data = Record::from_json(json!({"title": "A"})).unwrap();
        let update = Params::Update { id: RecordId::Int(3), data: data.clone(), previous_data: None };
        let request = flavor().http_request_from_action(Verb::Update, "posts", &update).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://api.test/posts/3");
        assert_eq!(request.body, Some(json!({"title": "A"})));

        let create = Params::Create { data };
        let request = flavor().http_request_from_action(Verb::Create, "posts", &create).unwrap();
        assert_eq!((request.method, request.url.as_str()), (Method::Post, "http://api.test/posts"));

        let delete = Params::Delete { id: RecordId::Int(3), previous_data: None };
        let request = flavor().http_request_from_action(Verb::Delete, "posts", &delete).unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.body, None);
    }

    #[test]
    fn string_ids_are_one_path_segment() {
        let params = Params::GetOne { id: RecordId::from("a/b c?#") };
        let request = flavor().http_request_from_action(Verb::GetOne, "posts", &params).unwrap();
        assert_eq!(request.url, "http://api.test/posts/a%2Fb%20c%3F%23");
    }

    #[test]
    fn list_total_comes_from_header() {
        let params = Params::GetList { pagination: Pagination::default(), sort: Sort::default(), filter: Filter::new() };
        let response = HttpResponse::new(200, json!([{"id": 1}, {"id": 2}])).with_header("x-total-count", "0-1/42");
        let result = flavor().success_payload_from_http_response(response, Verb::GetList, "posts", &params).unwrap();
        assert_eq!(result.total, Some(42));
        assert_eq!(result.ids("id"), vec![RecordId::Int(1), RecordId::Int(2)]);
    }

    #[test]
    fn list_without_total_header_is_rejected() {
        let params = Params::GetList { pagination: Pagination::default(), sort: Sort::default(), filter: Filter::new() };
        let response = HttpResponse::new(200, json!([]));
        let err = flavor().success_payload_from_http_response(response, Verb::GetList, "posts", &params).unwrap_err();
        assert!(err.message.contains("X-Total-Count"));
    }

    #[test]
    fn create_echoes_data_with_server_id() {
        let params = Params::Create { data: Record::from_json(json!({"title": "A"})).unwrap() };
        let response = HttpResponse::new(201, json!({"id": 5, "title": "A", "extra": true}));
        let result = flavor().success_payload_from_http_response(response, Verb::Create, "posts", &params).unwrap();
        assert_eq!(result.record().cloned().map(Record::into_json), Some(json!({"title": "A", "id": 5})));
    }
}
