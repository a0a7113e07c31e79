//! Volumes: `volumes`, `volumes/create`, `volumes/{name}`, `volumes/prune`.

use tracing::warn;

use crate::client::{decode, expect_success, filters_param, ApiClient};
use crate::docker::Docker;
use crate::error::{Done, ErrorResponse, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{Endpoint, Operation, Resource};
use crate::types::{
    Volume, VolumeCreateOptions, VolumeListFilters, VolumeListResponse, VolumePruneFilters,
    VolumePruneResponse,
};

const LIST: Endpoint = Endpoint::new(Resource::Volume, Operation::List);
const CREATE: Endpoint = Endpoint::new(Resource::Volume, Operation::Create);
const INSPECT: Endpoint = Endpoint::new(Resource::Volume, Operation::Inspect);
const DELETE: Endpoint = Endpoint::new(Resource::Volume, Operation::Delete);
const PRUNE: Endpoint = Endpoint::new(Resource::Volume, Operation::Prune);

impl ApiClient {
    pub fn build_list_volumes(&self, filters: &VolumeListFilters) -> Result<HttpRequest, Failure> {
        let mut request = self.request(HttpMethod::Get, &["volumes"])?;
        request.query.push(filters_param(filters)?);
        Ok(request)
    }

    pub fn build_create_volume(
        &self,
        options: &VolumeCreateOptions,
    ) -> Result<HttpRequest, Failure> {
        self.json_request(HttpMethod::Post, &["volumes", "create"], options)
    }

    pub fn build_inspect_volume(&self, name: &str) -> Result<HttpRequest, Failure> {
        self.request(HttpMethod::Get, &["volumes", name])
    }

    pub fn build_delete_volume(&self, name: &str, force: bool) -> Result<HttpRequest, Failure> {
        let mut request = self.request(HttpMethod::Delete, &["volumes", name])?;
        request.query.push(("force".to_string(), force.to_string()));
        Ok(request)
    }

    pub fn build_prune_volumes(
        &self,
        filters: &VolumePruneFilters,
    ) -> Result<HttpRequest, Failure> {
        let mut request = self.request(HttpMethod::Post, &["volumes", "prune"])?;
        request.query.push(filters_param(filters)?);
        Ok(request)
    }

    /// Unwraps the `{Volumes, Warnings}` envelope, logging any warnings.
    pub fn parse_list_volumes(&self, response: HttpResponse) -> Result<Vec<Volume>, Failure> {
        let envelope: VolumeListResponse = decode(response)?;
        for warning in envelope.warnings.iter().flatten() {
            warn!("engine: {warning}");
        }
        Ok(envelope.volumes.unwrap_or_default())
    }

    pub fn parse_create_volume(&self, response: HttpResponse) -> Result<Volume, Failure> {
        decode(response)
    }

    pub fn parse_inspect_volume(&self, response: HttpResponse) -> Result<Volume, Failure> {
        decode(response)
    }

    pub fn parse_delete_volume(&self, response: HttpResponse) -> Result<(), Failure> {
        expect_success(response)
    }

    pub fn parse_prune_volumes(
        &self,
        response: HttpResponse,
    ) -> Result<VolumePruneResponse, Failure> {
        decode(response)
    }
}

/// Volume operations of a [`Docker`] client.
#[derive(Debug, Clone, Copy)]
pub struct Volumes<'a> {
    docker: &'a Docker,
}

impl<'a> Volumes<'a> {
    pub(crate) fn new(docker: &'a Docker) -> Self {
        Self { docker }
    }

    pub async fn list(&self, filters: &VolumeListFilters) -> Result<Vec<Volume>, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(LIST, api.build_list_volumes(filters), |response| {
                api.parse_list_volumes(response)
            })
            .await
    }

    pub async fn create(&self, options: &VolumeCreateOptions) -> Result<Volume, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(CREATE, api.build_create_volume(options), |response| {
                api.parse_create_volume(response)
            })
            .await
    }

    pub async fn inspect(&self, name: &str) -> Result<Volume, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(INSPECT, api.build_inspect_volume(name), |response| {
                api.parse_inspect_volume(response)
            })
            .await
    }

    /// Removes a volume. `force` also succeeds when the volume is already gone.
    pub async fn delete(&self, name: &str, force: bool) -> Done {
        let api = self.docker.api();
        self.docker
            .call(DELETE, api.build_delete_volume(name, force), |response| {
                api.parse_delete_volume(response)
            })
            .await
            .into()
    }

    /// Deletes unused volumes.
    pub async fn prune(
        &self,
        filters: &VolumePruneFilters,
    ) -> Result<VolumePruneResponse, ErrorResponse> {
        let api = self.docker.api();
        self.docker
            .call(PRUNE, api.build_prune_volumes(filters), |response| {
                api.parse_prune_volumes(response)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::testing::{docker, Scripted};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:2375")
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_volumes_sends_empty_filters() {
        let req = client().build_list_volumes(&VolumeListFilters::default()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:2375/volumes");
        assert_eq!(req.query_param("filters"), Some("{}"));
    }

    #[test]
    fn build_delete_volume_sends_force() {
        let req = client().build_delete_volume("test-volume", true).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:2375/volumes/test-volume");
        assert_eq!(req.query_param("force"), Some("true"));
    }

    #[test]
    fn build_prune_volumes_posts_label_filters() {
        let filters = VolumePruneFilters {
            label: vec!["tmp".to_string()],
            label_not: vec!["keep=true".to_string()],
        };
        let req = client().build_prune_volumes(&filters).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:2375/volumes/prune");
        assert_eq!(
            req.query_param("filters"),
            Some(r#"{"label":["tmp"],"label!":["keep=true"]}"#)
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_volumes_unwraps_envelope() {
        let volumes = client()
            .parse_list_volumes(ok(
                200,
                r#"{"Volumes":[{"Name":"tardis","Driver":"local","Mountpoint":"/var/lib/docker/volumes/tardis","Scope":"local"}],"Warnings":["something odd"]}"#,
            ))
            .unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "tardis");
    }

    #[test]
    fn parse_list_volumes_accepts_null_list() {
        let volumes = client()
            .parse_list_volumes(ok(200, r#"{"Volumes":null,"Warnings":null}"#))
            .unwrap();
        assert!(volumes.is_empty());
    }

    #[tokio::test]
    async fn delete_success_is_done() {
        let transport = Scripted::default().reply(204, "");
        let done = docker(&transport).volume().delete("test-volume", false).await;
        assert!(done.done);
        assert!(done.error.is_none());
    }

    #[tokio::test]
    async fn delete_in_use_is_not_done() {
        let transport = Scripted::default().reply(
            409,
            r#"{"message":"remove test-volume: volume is in use - [8dfafdbc3a40]"}"#,
        );
        let done = docker(&transport).volume().delete("test-volume", false).await;
        assert!(!done.done);
        let err = done.error.unwrap();
        assert_eq!(err.code, 409);
        assert_eq!(err.message, "Volume is in use and cannot be removed.");
    }

    #[tokio::test]
    async fn inspect_and_list_have_their_own_404() {
        let transport = Scripted::default().reply(404, "").reply(404, "");
        let docker = docker(&transport);

        let err = docker.volume().inspect("gone").await.unwrap_err();
        assert_eq!(err.message, "No such volume.");

        let err = docker.volume().list(&Default::default()).await.unwrap_err();
        assert_eq!(err.message, "Could not find any volumes.");
    }

    #[tokio::test]
    async fn create_and_prune_keep_reason_phrases() {
        let transport = Scripted::default().reply(500, "").reply(500, "");
        let docker = docker(&transport);

        let err = docker.volume().create(&Default::default()).await.unwrap_err();
        assert_eq!(err.message, "Internal Server Error");

        let err = docker.volume().prune(&Default::default()).await.unwrap_err();
        assert_eq!(err.message, "Internal Server Error");
    }
}
