//! CSV 업로드 파싱
//!
//! 모든 행을 먼저 읽은 뒤 처리를 시작하므로, 형식 오류가 있으면 아무 티켓도 처리되지 않습니다.

use axum::extract::Multipart;

use crate::error::AppError;

/// 필수 컬럼 이름
pub const TICKET_COLUMN: &str = "ticket_text";

/// 업로드 폼의 파일 필드 이름
pub const FILE_FIELD: &str = "file";

/// multipart 본문에서 `file` 필드의 바이트를 꺼낸다
pub async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        // 파일을 고르지 않고 제출하면 이름 없는 빈 필드가 옴
        if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
            break;
        }
        tracing::info!(file = ?file_name, size = bytes.len(), "Ticket file uploaded");
        return Ok(bytes.to_vec());
    }

    Err(AppError::bad_request("Choose a CSV file with support tickets"))
}

/// CSV 바이트에서 `ticket_text` 컬럼 값을 행 순서대로 추출
pub fn read_ticket_texts(bytes: &[u8]) -> Result<Vec<String>, AppError> {
    // 뒤쪽 빈 셀이 잘린 행은 허용하고, 헤더보다 긴 행은 아래에서 거부
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(AppError::CsvParse("No columns to parse from file".to_string()));
    }

    let column = headers
        .iter()
        .position(|name| name == TICKET_COLUMN)
        .ok_or_else(|| AppError::MissingColumn(TICKET_COLUMN.to_string()))?;

    let mut tickets = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::CsvParse(format!(
                "Expected {} fields in line {line}, saw {}",
                headers.len(),
                record.len()
            )));
        }
        tickets.push(record.get(column).unwrap_or_default().to_string());
    }

    tracing::debug!(rows = tickets.len(), "Parsed ticket upload");
    Ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_file_order() {
        let csv = "id,ticket_text\n1,My wifi is down\n2,\"Payment failed, charged twice\"\n3,Site crashed\n";
        let tickets = read_ticket_texts(csv.as_bytes()).unwrap();
        assert_eq!(
            tickets,
            vec![
                "My wifi is down".to_string(),
                "Payment failed, charged twice".to_string(),
                "Site crashed".to_string(),
            ]
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_ticket_texts(b"id,text\n1,hello\n").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "ticket_text"));
    }

    #[test]
    fn header_only_file_has_no_tickets() {
        let tickets = read_ticket_texts(b"ticket_text\n").unwrap();
        assert!(tickets.is_empty());
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let err = read_ticket_texts(b"").unwrap_err();
        assert!(matches!(err, AppError::CsvParse(_)));
    }

    #[test]
    fn rows_longer_than_header_are_a_parse_error() {
        let err = read_ticket_texts(b"ticket_text,id\nhello,1\nworld,2,extra\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error processing file: Expected 2 fields in line 3, saw 3"
        );
    }

    #[test]
    fn short_rows_become_empty_tickets() {
        let tickets = read_ticket_texts(b"id,ticket_text\n1,hello\n2\n").unwrap();
        assert_eq!(tickets, vec!["hello".to_string(), String::new()]);
    }

    #[test]
    fn empty_cells_are_kept_as_empty_tickets() {
        let tickets = read_ticket_texts(b"id,ticket_text\n1,\n2,hello\n").unwrap();
        assert_eq!(tickets, vec![String::new(), "hello".to_string()]);
    }
}
