//! Swarm configs: `configs`, `configs/create`, `configs/{id}`,
//! `configs/{id}/update`.
//!
//! Every endpoint here needs the engine to be part of a swarm; otherwise it
//! answers 503.

use crate::client::{decode, expect_success, filters_param, ApiClient};
use crate::docker::Docker;
use crate::error::{Done, ErrorResponse, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{Endpoint, Operation, Resource};
use crate::types::{Config, ConfigFilters, ConfigSpec, ConfigUpdateParams, IdResponse};

const LIST: Endpoint = Endpoint::new(Resource::Config, Operation::List);
const CREATE: Endpoint = Endpoint::new(Resource::Config, Operation::Create);
const INSPECT: Endpoint = Endpoint::new(Resource::Config, Operation::Inspect);
const DELETE: Endpoint = Endpoint::new(Resource::Config, Operation::Delete);
const UPDATE: Endpoint = Endpoint::new(Resource::Config, Operation::Update);

impl ApiClient {
    pub fn build_list_configs(&self, filters: &ConfigFilters) -> Result<HttpRequest, Failure> {
        let mut request = self.request(HttpMethod::Get, &["configs"])?;
        request.query.push(filters_param(filters)?);
        Ok(request)
    }

    /// Builds the create request. `spec.data` is raw text and gets base64
    /// encoded here.
    pub fn build_create_config(&self, spec: &ConfigSpec) -> Result<HttpRequest, Failure> {
        self.json_request(HttpMethod::Post, &["configs", "create"], &spec.encoded())
    }

    pub fn build_inspect_config(&self, id: &str) -> Result<HttpRequest, Failure> {
        self.request(HttpMethod::Get, &["configs", id])
    }

    pub fn build_delete_config(&self, id: &str) -> Result<HttpRequest, Failure> {
        self.request(HttpMethod::Delete, &["configs", id])
    }

    /// Builds the update request. The spec is sent as is; its `Data` is
    /// expected in wire (base64) form already.
    pub fn build_update_config(&self, params: &ConfigUpdateParams) -> Result<HttpRequest, Failure> {
        let segments = ["configs", params.id.as_str(), "update"];
        let mut request = self.json_request(HttpMethod::Post, &segments, &params.spec)?;
        request
            .query
            .push(("version".to_string(), params.version.to_string()));
        Ok(request)
    }

    pub fn parse_list_configs(&self, response: HttpResponse) -> Result<Vec<Config>, Failure> {
        decode(response)
    }

    pub fn parse_create_config(&self, response: HttpResponse) -> Result<IdResponse, Failure> {
        decode(response)
    }

    pub fn parse_inspect_config(&self, response: HttpResponse) -> Result<Config, Failure> {
        decode(response)
    }

    pub fn parse_delete_config(&self, response: HttpResponse) -> Result<(), Failure> {
        expect_success(response)
    }

    pub fn parse_update_config(&self, response: HttpResponse) -> Result<(), Failure> {
        expect_success(response)
    }
}

/// Config operations of a [`Docker`] client.
#[derive(Debug, Clone, Copy)]
pub struct Configs<'a> {
    docker: &'a Docker,
}

impl<'a> Configs<'a> {
    pub(crate) fn new(docker: &'a Docker) -> Self {
        Self { docker }
    }

    /// Lists configs matching `filters`.
    pub async fn list(&self, filters: &ConfigFilters) -> Result<Vec<Config>, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(LIST, api.build_list_configs(filters), |response| {
                api.parse_list_configs(response)
            })
            .await
    }

    /// Creates a config and returns its ID.
    pub async fn create(&self, spec: &ConfigSpec) -> Result<IdResponse, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(CREATE, api.build_create_config(spec), |response| {
                api.parse_create_config(response)
            })
            .await
    }

    /// Inspects a config by ID or name.
    pub async fn inspect(&self, id: &str) -> Result<Config, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(INSPECT, api.build_inspect_config(id), |response| {
                api.parse_inspect_config(response)
            })
            .await
    }

    /// Deletes a config by ID or name.
    pub async fn delete(&self, id: &str) -> Done {
        let api = self.docker.api();
        self.docker
            .call(DELETE, api.build_delete_config(id), |response| {
                api.parse_delete_config(response)
            })
            .await
            .into()
    }

    /// Updates a config, guarded by its object version.
    ///
    /// The engine only accepts changes to `Labels`; every other field must
    /// match what inspecting the config returns.
    pub async fn update(&self, params: &ConfigUpdateParams) -> Done {
        let api = self.docker.api();
        self.docker
            .call(UPDATE, api.build_update_config(params), |response| {
                api.parse_update_config(response)
            })
            .await
            .into()
    }
}
