use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ApiClient, errors::Error};

/// REST collections exposed by the school administration API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Students,
    Teachers,
    Attendance,
    Fees,
    Results,
    Timetable,
    Communications,
    Audit,
    Schools,
    Subscriptions,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Students,
        Resource::Teachers,
        Resource::Attendance,
        Resource::Fees,
        Resource::Results,
        Resource::Timetable,
        Resource::Communications,
        Resource::Audit,
        Resource::Schools,
        Resource::Subscriptions,
    ];

    /// Collection path relative to the API base, with trailing slash.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Students => "students/",
            Resource::Teachers => "teachers/",
            Resource::Attendance => "attendance/",
            Resource::Fees => "fees/",
            Resource::Results => "results/",
            Resource::Timetable => "timetable/",
            Resource::Communications => "communications/",
            Resource::Audit => "audit/",
            Resource::Schools => "schools/",
            Resource::Subscriptions => "subscriptions/",
        }
    }

    pub fn item_path(self, id: impl fmt::Display) -> String {
        format!("{}{}/", self.path(), urlencoding::encode(&id.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_end_matches('/'))
    }
}

/// CRUD calls against one collection. Response schemas belong to the server, so every
/// call is generic over the body types.
pub struct ResourceClient<'a> {
    client: &'a ApiClient,
    resource: Resource,
}

impl<'a> ResourceClient<'a> {
    pub(crate) fn new(client: &'a ApiClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub async fn list<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T, Error> {
        self.client
            .get_json_with_query(self.resource.path(), query)
            .await
    }

    pub async fn retrieve<T: DeserializeOwned>(&self, id: impl fmt::Display) -> Result<T, Error> {
        self.client.get_json(&self.resource.item_path(id)).await
    }

    pub async fn create<B, T>(&self, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.post_json(self.resource.path(), body).await
    }

    pub async fn update<B, T>(&self, id: impl fmt::Display, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .patch_json(&self.resource.item_path(id), body)
            .await
    }

    pub async fn delete(&self, id: impl fmt::Display) -> Result<(), Error> {
        self.client.delete(&self.resource.item_path(id)).await
    }
}
