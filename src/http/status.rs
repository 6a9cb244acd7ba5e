//! # Códigos de Estado HTTP
//!
//! Códigos que el servidor genera por su cuenta: los del responder de
//! archivos estáticos y los de las respuestas enlatadas de error.
//!
//! - **2xx**: Éxito (200 OK)
//! - **4xx**: Error del cliente (400, 403, 404, 408, 413, 431)
//! - **5xx**: Error del servidor (500)
//!
//! Un responder puede usar cualquier otro código: `Response` guarda el
//! código y la razón como valores libres.

/// Códigos de estado conocidos por el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Request line o headers malformados
    BadRequest = 400,

    /// 403 Forbidden - Path fuera del document root
    Forbidden = 403,

    /// 404 Not Found - Archivo no encontrado
    NotFound = 404,

    /// 408 Request Timeout - El cliente dejó de enviar bytes
    RequestTimeout = 408,

    /// 413 Payload Too Large - Body mayor al límite configurado
    PayloadTooLarge = 413,

    /// 431 Request Header Fields Too Large - Bloque de headers mayor al límite
    RequestHeaderFieldsTooLarge = 431,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use goserv::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use goserv::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
