// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Lookups and deletes on individual resources

use crate::error::Result;
use crate::types::{Kind, ResourceRef};
use k8s_openapi::api::core::v1::Service;
use kube::{
    api::{DeleteParams, DynamicObject},
    discovery::ApiResource,
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Dynamic API handle for a referenced resource
pub(crate) fn dynamic_api(client: &Client, resource: &ResourceRef, ar: &ApiResource) -> Api<DynamicObject> {
    match resource.namespace.as_deref() {
        Some(ns) if resource.kind.is_namespaced() => Api::namespaced_with(client.clone(), ns, ar),
        _ => Api::all_with(client.clone(), ar),
    }
}

/// Delete a resource; returns whether it existed
#[instrument(skip(client), fields(resource = %resource))]
pub async fn delete_if_present(client: &Client, resource: &ResourceRef) -> Result<bool> {
    let api = dynamic_api(client, resource, &resource.api_resource());

    match api.delete(&resource.name, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deleted {}", resource);
            Ok(true)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("{} not present, nothing to delete", resource);
            Ok(false)
        }
        // A namespace already being torn down answers a repeated delete with 409
        Err(kube::Error::Api(err)) if err.code == 409 && resource.kind == Kind::Namespace => {
            debug!("{} is already terminating", resource);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch a service, `None` if it does not exist
#[instrument(skip(client))]
pub async fn get_service(client: &Client, namespace: &str, name: &str) -> Result<Option<Service>> {
    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    Ok(services.get_opt(name).await?)
}
