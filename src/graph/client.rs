//! Graph list-items client.

// crates.io
use reqwest::{StatusCode, header};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ListId, SiteId},
	error::{ConfigError, GraphError},
	graph::{GRACE_DAYS_FIELD, ID_FIELD, ListItemsPage, NAME_FIELD},
	obs::{self, Outcome, Stage, StageSpan},
};

/// Reads the course list through `GET /v1.0/sites/{site}/lists/{list}/items`.
///
/// Redirects are followed according to the policy of the supplied client.
#[derive(Clone)]
pub struct ListClient {
	http_client: ReqwestClient,
	items_url: Url,
}
impl ListClient {
	/// Prepares the items URL for `site`/`list` under `graph_base_url`.
	pub fn new(
		http_client: ReqwestClient,
		graph_base_url: &Url,
		site: &SiteId,
		list: &ListId,
	) -> Result<Self, ConfigError> {
		Ok(Self { http_client, items_url: items_url(graph_base_url, site, list)? })
	}

	/// Fully-qualified URL the client requests.
	pub fn items_url(&self) -> &Url {
		&self.items_url
	}

	/// Fetches a single page of list items with `token`.
	///
	/// Any status other than 200 is reported as [`GraphError::UpstreamStatus`] so the caller
	/// can forward it.
	pub async fn fetch_items(&self, token: &AccessToken) -> Result<ListItemsPage, GraphError> {
		const STAGE: Stage = Stage::ListFetch;

		let span = StageSpan::new(STAGE, "fetch_items");

		obs::record_stage_outcome(STAGE, Outcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self
					.http_client
					.get(self.items_url.clone())
					.header(header::AUTHORIZATION, token.bearer())
					.header(header::ACCEPT, "application/json")
					.send()
					.await
					.inspect_err(|e| tracing::error!(error = %e, "Graph could not be reached."))?;
				let status = response.status();

				if status != StatusCode::OK {
					let body = response.bytes().await.unwrap_or_default();

					tracing::error!(
						status = status.as_u16(),
						body = %obs::body_preview(&body),
						"Graph rejected the list items request."
					);

					return Err(GraphError::UpstreamStatus { status: status.as_u16() });
				}

				let bytes = response.bytes().await?;
				let mut de = serde_json::Deserializer::from_slice(&bytes);
				let page: ListItemsPage =
					serde_path_to_error::deserialize(&mut de).map_err(|e| {
						tracing::error!(error = %e, "Graph returned a malformed list items page.");

						GraphError::Parse(e)
					})?;

				tracing::debug!(items = page.value.len(), "Fetched list items.");

				Ok::<_, GraphError>(page)
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, Outcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, Outcome::Failure),
		}

		result
	}
}
impl Debug for ListClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ListClient").field("items_url", &self.items_url.as_str()).finish()
	}
}

fn items_url(base: &Url, site: &SiteId, list: &ListId) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::CannotBeABase { name: "GRAPH_BASE_URL", url: base.to_string() })?
		.pop_if_empty()
		.extend(["v1.0", "sites", site.as_ref(), "lists", list.as_ref(), "items"]);
	url.query_pairs_mut().append_pair("$expand", &expand_fields());

	Ok(url)
}

fn expand_fields() -> String {
	format!("fields($select={ID_FIELD},{NAME_FIELD},{GRACE_DAYS_FIELD})")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn items_url_selects_the_projected_columns() {
		let base = Url::parse("https://graph.microsoft.com").expect("Graph URL should parse.");
		let site = SiteId::new("contoso.sharepoint.com,1111,2222").expect("Site should be valid.");
		let list = ListId::new("Cursos").expect("List should be valid.");
		let client = ListClient::new(ReqwestClient::new(), &base, &site, &list)
			.expect("Client should build.");
		let url = client.items_url();

		assert_eq!(url.path(), "/v1.0/sites/contoso.sharepoint.com,1111,2222/lists/Cursos/items");
		assert_eq!(
			url.query_pairs().find(|(key, _)| key == "$expand").map(|(_, value)| value.into_owned()),
			Some("fields($select=ID,NombreCursoEstandar,ContadorDiasGracia)".to_owned()),
		);
	}

	#[test]
	fn items_url_keeps_a_base_path_prefix() {
		let base = Url::parse("http://127.0.0.1:9000/graph/").expect("Graph URL should parse.");
		let site = SiteId::new("site").expect("Site should be valid.");
		let list = ListId::new("list").expect("List should be valid.");
		let url = items_url(&base, &site, &list).expect("URL should build.");

		assert_eq!(url.path(), "/graph/v1.0/sites/site/lists/list/items");
	}
}
