//! Names of the settings the provisioner reads and writes.

pub const API_KEY: &str = "GEMINI_API_KEY";
pub const ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
pub const REGION: &str = "AWS_REGION";
pub const BUCKET: &str = "S3_BUCKET_TAREAS";
pub const ALLOWED_ORIGINS: &str = "S3_ALLOWED_ORIGINS";
pub const PUBLIC_READ: &str = "S3_PUBLIC_READ";

/// A table whose name is taken from a setting and whose key layout is read
/// from a JSON schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableKey {
    pub setting: &'static str,
    pub schema_file: &'static str,
}

pub const TABLES: [TableKey; 6] = [
    TableKey {
        setting: "TABLE_USUARIOS",
        schema_file: "Usuario.json",
    },
    TableKey {
        setting: "TABLE_TAREAS",
        schema_file: "Tarea.json",
    },
    TableKey {
        setting: "TABLE_HISTORIAL",
        schema_file: "Historial.json",
    },
    TableKey {
        setting: "TABLE_DATOS_SOCIOECONOMICOS",
        schema_file: "DatosSocioeconomicos.json",
    },
    TableKey {
        setting: "TABLE_DATOS_EMOCIONALES",
        schema_file: "DatosEmocionales.json",
    },
    TableKey {
        setting: "TABLE_DATOS_ACADEMICOS",
        schema_file: "DatosAcademicos.json",
    },
];

/// Every setting that must be present and non-empty before provisioning.
pub fn required() -> Vec<&'static str> {
    std::iter::once(API_KEY)
        .chain(TABLES.iter().map(|t| t.setting))
        .collect()
}
