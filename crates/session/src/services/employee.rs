//! Employee management service

use bytes::Bytes;
use portico_http::{ClientError, ConsoleClient};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePage {
    pub items: Vec<Employee>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Fields the console submits when creating or updating an employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct EmployeeService {
    client: ConsoleClient,
}

impl EmployeeService {
    pub fn new(client: ConsoleClient) -> Self {
        Self { client }
    }

    /// List employees with pagination and optional name search
    pub async fn list(
        &self,
        page: usize,
        page_size: usize,
        search: Option<&str>,
    ) -> Result<EmployeePage, ClientError> {
        let mut query = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(term) = search {
            query.push(("search", term.to_string()));
        }
        self.client
            .execute(self.client.request(Method::GET, "/employee").query(&query))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Employee, ClientError> {
        self.client.get(&format!("/employee/{id}")).await
    }

    pub async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, ClientError> {
        self.client.post("/employee", draft).await
    }

    pub async fn update(&self, id: i64, draft: &EmployeeDraft) -> Result<Employee, ClientError> {
        self.client.put(&format!("/employee/{id}"), draft).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ClientError> {
        let _: serde_json::Value = self.client.delete(&format!("/employee/{id}")).await?;
        Ok(())
    }

    /// Download the employee table as a spreadsheet stream
    pub async fn export(&self) -> Result<Bytes, ClientError> {
        self.client.download("/employee/export").await
    }
}
