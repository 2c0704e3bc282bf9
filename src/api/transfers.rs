use reqwest::Method;

use super::{decode, encode, FormParts};
use crate::client::BitDotIo;
use crate::db::Connector;
use crate::error::{ClientError, ClientResult};
use crate::models::{ExportJob, ExportJobConfig, ImportJob, ImportJobConfig};

/// Schema assumed when exporting a table without an explicit schema
const DEFAULT_SCHEMA: &str = "public";

/// Builds the multipart body for an import job
fn import_form(table_name: &str, config: ImportJobConfig) -> ClientResult<FormParts> {
    if config.file.is_some() == config.file_url.is_some() {
        return Err(ClientError::InvalidInput(
            "must provide exactly one of file or file_url".to_string(),
        ));
    }

    let mut form = FormParts::default();
    form.fields
        .push(("table_name".to_string(), table_name.to_string()));
    if let Some(schema_name) = config.schema_name {
        form.fields.push(("schema_name".to_string(), schema_name));
    }
    if let Some(infer_header) = config.infer_header {
        form.fields
            .push(("infer_header".to_string(), infer_header.to_string()));
    }
    if let Some(file_url) = config.file_url {
        form.fields.push(("file_url".to_string(), file_url));
    }
    if let Some(file) = config.file {
        form.files.push(("file".to_string(), file));
    }

    Ok(form)
}

/// Validates an export job and fills in the default schema
fn prepare_export(mut config: ExportJobConfig) -> ClientResult<ExportJobConfig> {
    if config.query_string.is_some() == config.table_name.is_some() {
        return Err(ClientError::InvalidInput(
            "must provide exactly one of query_string or table_name".to_string(),
        ));
    }
    if config.table_name.is_some() && config.schema_name.is_none() {
        config.schema_name = Some(DEFAULT_SCHEMA.to_string());
    }
    Ok(config)
}

fn validate_db_name(db_name: &str) -> ClientResult<()> {
    match db_name.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => Err(ClientError::InvalidInput(format!(
            "database name must look like 'owner/name', got '{}'",
            db_name
        ))),
    }
}

impl<C: Connector> BitDotIo<C> {
    /// Starts an import of a file (uploaded or by URL) into `table_name`
    pub async fn create_import_job(
        &self,
        db_name: &str,
        table_name: &str,
        config: ImportJobConfig,
    ) -> ClientResult<ImportJob> {
        validate_db_name(db_name)?;
        let form = import_form(table_name, config)?;
        let path = format!("db/{}/import/", db_name);

        let body = self
            .api_client
            .call_multipart(Method::POST, &path, form)
            .await?;
        decode(&body)
    }

    pub async fn get_import_job(&self, import_id: &str) -> ClientResult<ImportJob> {
        let path = format!("import/{}", import_id);
        let body = self.api_client.call(Method::GET, &path, None).await?;
        decode(&body)
    }

    /// Starts an export of a table or query result
    pub async fn create_export_job(
        &self,
        db_name: &str,
        config: ExportJobConfig,
    ) -> ClientResult<ExportJob> {
        validate_db_name(db_name)?;
        let config = prepare_export(config)?;
        let path = format!("db/{}/export/", db_name);

        let body = self
            .api_client
            .call(Method::POST, &path, encode(&config)?)
            .await?;
        decode(&body)
    }

    pub async fn get_export_job(&self, export_id: &str) -> ClientResult<ExportJob> {
        let path = format!("export/{}", export_id);
        let body = self.api_client.call(Method::GET, &path, None).await?;
        decode(&body)
    }
}
