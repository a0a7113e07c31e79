//! Containers: `containers/json`.

use crate::client::{decode, filters_param, ApiClient};
use crate::docker::Docker;
use crate::error::{ErrorResponse, Failure};
use crate::filters::FilterSet;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{Endpoint, Operation, Resource};
use crate::types::{ContainerListParams, ContainerSummary};

const LIST: Endpoint = Endpoint::new(Resource::Container, Operation::List);

impl ApiClient {
    /// Builds the list request. Parameters are only sent when set.
    pub fn build_list_containers(
        &self,
        params: &ContainerListParams,
    ) -> Result<HttpRequest, Failure> {
        let mut request = self.request(HttpMethod::Get, &["containers", "json"])?;
        if let Some(all) = params.all {
            request.query.push(("all".to_string(), all.to_string()));
        }
        if let Some(limit) = params.limit {
            request.query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(size) = params.size {
            request.query.push(("size".to_string(), size.to_string()));
        }
        if !params.filters.encode().is_empty() {
            request.query.push(filters_param(&params.filters)?);
        }
        Ok(request)
    }

    pub fn parse_list_containers(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ContainerSummary>, Failure> {
        decode(response)
    }
}

/// Container operations of a [`Docker`] client.
#[derive(Debug, Clone, Copy)]
pub struct Containers<'a> {
    docker: &'a Docker,
}

impl<'a> Containers<'a> {
    pub(crate) fn new(docker: &'a Docker) -> Self {
        Self { docker }
    }

    pub async fn list(
        &self,
        params: &ContainerListParams,
    ) -> Result<Vec<ContainerSummary>, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(LIST, api.build_list_containers(params), |response| {
                api.parse_list_containers(response)
            })
            .await
    }
}
