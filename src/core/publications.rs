use crate::domain::model::{Comercio, Publication};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::NaiveDate;

/// Appends a publication dated `date` (the caller passes today).
pub fn append(
    comercio: &mut Comercio,
    title: impl Into<String>,
    description: impl Into<String>,
    image: impl Into<String>,
    date: NaiveDate,
) -> Result<()> {
    let title = title.into();
    let description = description.into();
    let image = image.into();
    validate_non_empty_string("title", &title)?;
    validate_non_empty_string("description", &description)?;
    validate_non_empty_string("image", &image)?;

    comercio.publications.push(Publication {
        title,
        description,
        image,
        date,
    });
    Ok(())
}

/// Replaces title/description/image of the publication at `index`.
/// The original date is preserved; publications have no identity beyond
/// their position in the sequence.
pub fn edit(
    comercio: &mut Comercio,
    index: usize,
    title: impl Into<String>,
    description: impl Into<String>,
    image: impl Into<String>,
) -> Result<()> {
    let title = title.into();
    let description = description.into();
    let image = image.into();
    validate_non_empty_string("title", &title)?;
    validate_non_empty_string("description", &description)?;
    validate_non_empty_string("image", &image)?;

    let publication = comercio
        .publications
        .get_mut(index)
        .ok_or_else(|| DirectoryError::not_found(format!("Publication {}", index)))?;
    publication.title = title;
    publication.description = description;
    publication.image = image;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_comercio() -> Comercio {
        Comercio {
            id: "1".to_string(),
            name: "Café Central".to_string(),
            cif: String::new(),
            country: String::new(),
            city: "Madrid".to_string(),
            address: String::new(),
            email: "central@cafe.com".to_string(),
            phone: String::new(),
            category: "cafetería".to_string(),
            password: "pw".to_string(),
            image: String::new(),
            scoring: 0.0,
            nscore: 0,
            reviews: vec![],
            publications: vec![],
            version: 0,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn append_keeps_order_and_stamps_the_given_date() {
        let mut comercio = empty_comercio();
        append(&mut comercio, "Aniversario", "10% dto", "a.png", day("2026-08-01")).unwrap();
        append(&mut comercio, "Cierre agosto", "Vacaciones", "b.png", day("2026-08-05")).unwrap();

        assert_eq!(comercio.publications.len(), 2);
        assert_eq!(comercio.publications[0].title, "Aniversario");
        assert_eq!(comercio.publications[1].date, day("2026-08-05"));
    }

    #[test]
    fn edit_replaces_fields_but_preserves_the_date() {
        let mut comercio = empty_comercio();
        append(&mut comercio, "Aniversario", "10% dto", "a.png", day("2026-08-01")).unwrap();

        edit(&mut comercio, 0, "Aniversario!", "20% dto", "a2.png").unwrap();

        let publication = &comercio.publications[0];
        assert_eq!(publication.title, "Aniversario!");
        assert_eq!(publication.description, "20% dto");
        assert_eq!(publication.image, "a2.png");
        assert_eq!(publication.date, day("2026-08-01"));
    }

    #[test]
    fn edit_out_of_range_index_is_an_error() {
        let mut comercio = empty_comercio();
        let err = edit(&mut comercio, 0, "t", "d", "i").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut comercio = empty_comercio();
        assert!(append(&mut comercio, "", "d", "i", day("2026-08-01")).is_err());
        assert!(append(&mut comercio, "t", "  ", "i", day("2026-08-01")).is_err());
        assert!(comercio.publications.is_empty());
    }
}
