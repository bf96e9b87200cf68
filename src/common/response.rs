use serde::Serialize;

// Envoltura uniforme para listados: { success, data, total }.
#[derive(Debug, Serialize)]
pub struct ListaResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ListaResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            success: true,
            data,
            total,
            message: None,
        }
    }

    // Listado vacío con una aclaración (p. ej. filtro sin resultados).
    pub fn vacia_con_mensaje(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Vec::new(),
            total: 0,
            message: Some(message.into()),
        }
    }
}

// Envoltura para lecturas y mutaciones de un solo documento.
#[derive(Debug, Serialize)]
pub struct DatoResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DatoResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct MensajeResponse {
    pub success: bool,
    pub message: String,
}

impl MensajeResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
