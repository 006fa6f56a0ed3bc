//! Spanish (Puerto Rico) strings for the richdocuments front end.
//!
//! Transcribed verbatim from `l10n/es_PR.js`; the integration tests check the
//! two stay identical.

use crate::bundle::{BundleBuilder, LocalizationBundle};
use crate::error::L10nResult;

pub const DOMAIN: &str = "richdocuments";

pub const LOCALE: &str = "es_PR";

pub const PLURAL_FORMS: &str =
    "nplurals=3; plural=n == 1 ? 0 : n != 0 && n % 1000000 == 0 ? 1 : 2;";

pub const ENTRIES: &[(&str, &str)] = &[
    ("New Document.odt", "Nuevo Documento.odt"),
    ("New Spreadsheet.ods", "Nueva HojaDeCálculo.ods"),
    ("New Presentation.odp", "Nueva Presentación.odp"),
    ("New Document.docx", "Nuevo Documento.docx"),
    ("New Spreadsheet.xlsx", "Nueva HojaDeCálculo.xlsx"),
    ("New Presentation.pptx", "Nueva Presentación.pptx"),
    ("File already exists", "El archivo ya existe"),
    ("Saved", "Guardado"),
    ("The uploaded file exceeds the upload_max_filesize directive in php.ini", "El archivo cargado excede el valor establecido en la directiva upload_max_filesize en el archivo php.ini"),
    ("The uploaded file exceeds the MAX_FILE_SIZE directive that was specified in the HTML form", "El archivo cargado excede el valor especificado de la directiva MAX_FILE_SIZE en la forma de HTML"),
    ("No file was uploaded", "No se cargó el archivo"),
    ("Missing a temporary folder", "Falta una carpeta temporal"),
    ("File is too big", "El archivo es demasiado grande."),
    ("Invalid file provided", "Archivo proporcionado inválido"),
    ("Images", "Imágenes"),
    ("Empty", "Vacío"),
    ("Advanced settings", "Configuraciones avanzados"),
    ("Restrict usage to specific groups", "Limitar uso a grupos específicos"),
    ("Select groups", "Seleccionar grupos"),
    ("Restrict edit to specific groups", "Limitar edición a grupos específicos"),
    ("Enable access for external apps", "Habilitar acceso para aplicaciones externas"),
    ("Confirm", "Confirmar"),
    ("Cancel", "Cancelar"),
    ("Save", "Guardar"),
    ("Save As", "Guardar Como"),
    ("Submit", "Enviar"),
    ("Description", "Descripción"),
    ("No results", "No hay resultados"),
    ("Close", "Cerrar"),
    ("Error", "Error"),
    ("Nickname", "Apodo"),
    ("Failed to revert the document to older version", "Se presentó una falla al revertir el documento a la versión anterior"),
    ("Remove from favorites", "Eliminar de favoritos"),
    ("Add to favorites", "Agregar a tus favoritos"),
    ("Details", "Detalles"),
    ("Download", "Descargar"),
    ("Guest", "Invitado"),
    ("Create", "Crear"),
    ("Could not create file", "No fue posible crear el archivo"),
    ("Saved with error: Collabora Online should use the same protocol as the server installation.", "Guardado con error: Collabora Online debería usar el mismo protocolo que la instalación del servidor."),
    ("Please enter the filename to store the document as.", "Por favor ingresa el nombre del archivo con el cual almacenar el documento"),
    ("New filename", "Nuevo nombredearchivo"),
    ("Saving…", "Guardando..."),
    ("Collabora Online", "Collabora Online"),
];

/// Builds the validated `richdocuments` / `es_PR` bundle.
pub fn bundle() -> L10nResult<LocalizationBundle> {
    let mut builder = BundleBuilder::new(DOMAIN, LOCALE);
    builder.with_messages(ENTRIES.iter().copied())?;
    builder.build(PLURAL_FORMS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_entry_round_trips() {
        let bundle = bundle().unwrap();
        for (key, value) in ENTRIES {
            assert_eq!(bundle.translate(key).unwrap(), *value, "key: {}", key);
        }
    }

    #[test]
    fn test_entry_count_matches_distinct_keys() {
        let distinct: HashSet<&str> = ENTRIES.iter().map(|(key, _)| *key).collect();
        assert_eq!(distinct.len(), ENTRIES.len());
        assert_eq!(bundle().unwrap().len(), 44);
    }

    #[test]
    fn test_literal_characters_preserved() {
        let bundle = bundle().unwrap();
        assert_eq!(bundle.translate("Saving…").unwrap(), "Guardando...");
        assert_eq!(
            bundle.translate("New Spreadsheet.xlsx").unwrap(),
            "Nueva HojaDeCálculo.xlsx"
        );
        assert_eq!(
            bundle.translate("Collabora Online").unwrap(),
            "Collabora Online"
        );
        // no trailing period in the source
        assert_eq!(
            bundle
                .translate("Please enter the filename to store the document as.")
                .unwrap(),
            "Por favor ingresa el nombre del archivo con el cual almacenar el documento"
        );
    }

    #[test]
    fn test_plural_rule() {
        let bundle = bundle().unwrap();
        let rule = bundle.plural_rule();
        assert_eq!(rule.nplurals(), 3);
        assert_eq!(rule.category(0).unwrap(), 2);
        assert_eq!(rule.category(1).unwrap(), 0);
        assert_eq!(rule.category(1_000_000).unwrap(), 1);
    }
}
