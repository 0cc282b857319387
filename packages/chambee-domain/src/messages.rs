//! Canned assistant texts used whenever the pipeline degrades instead of failing.

pub const API_ERROR_TEXT: &str =
	"No pude contactar al asistente en este momento. Por favor, inténtalo de nuevo en unos minutos.";
pub const PARSE_ERROR_TEXT: &str =
	"Tuve problemas interpretando la respuesta. ¿Podrías reformular lo que necesitas?";
pub const DEFAULT_ASSISTANT_TEXT: &str = "No pude procesar eso. ¿Podrías intentarlo de nuevo?";
pub const MISSING_PROFESSION_TEXT: &str = "Para buscar necesito saber qué tipo de profesional necesitas. Por ejemplo: gasfitería, electricidad, carpintería, pintura, jardinería o limpieza.";
pub const NO_MATCHES_TEXT: &str =
	"No encontré prestadores con esos criterios. ¿Probamos algo más general?";
pub const STORE_ERROR_TEXT: &str = "Ups, tuve un problema técnico buscando en la base de datos.";

pub fn category_without_matches(profession: &str) -> String {
	format!(
		"Entendido, necesitas '{profession}'. De momento no encuentro a nadie, pero puedes explorar la categoría."
	)
}
