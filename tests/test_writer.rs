use rawhttp::http::error::WriteError;
use rawhttp::http::headers::Headers;
use rawhttp::http::response::{StatusCode, chunked_headers, default_headers};
use rawhttp::http::writer::{ResponseWriter, WriterState};

fn output(writer: ResponseWriter<Vec<u8>>) -> String {
    String::from_utf8(writer.into_inner()).unwrap()
}

#[tokio::test]
async fn test_write_fixed_length_response() {
    let mut writer = ResponseWriter::new(Vec::new());

    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&default_headers(5)).await.unwrap();
    let n = writer.write_body(b"hello").await.unwrap();

    assert_eq!(n, 5);
    assert!(writer.is_done());
    assert_eq!(
        output(writer),
        "HTTP/1.1 200 OK\r\nContent-length:5\r\nConnection:close\r\nContent-Type:text/html\r\n\r\nhello"
    );
}

#[tokio::test]
async fn test_write_status_lines() {
    let cases = [
        (StatusCode::Ok, "HTTP/1.1 200 OK\r\n"),
        (StatusCode::BadRequest, "HTTP/1.1 400 Bad Request\r\n"),
        (StatusCode::InternalServerError, "HTTP/1.1 500 Internal Server Error\r\n"),
    ];

    for (status, expected) in cases {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(status).await.unwrap();
        assert_eq!(writer.state(), WriterState::Headers);
        assert_eq!(output(writer), expected);
    }
}

#[tokio::test]
async fn test_write_chunked_body_and_trailers() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&Headers::new()).await.unwrap();
    let head = "HTTP/1.1 200 OK\r\n\r\n";

    let mut trailers = Headers::new();
    trailers.overwrite("X-Len", "3");

    writer.write_chunked_body(b"abc").await.unwrap();
    assert_eq!(writer.state(), WriterState::Body);
    writer.write_chunked_body_done(&trailers).await.unwrap();

    assert!(writer.is_done());
    let out = output(writer);
    assert_eq!(&out[head.len()..], "3\r\nabc\r\n0\r\nX-Len:3\r\n\r\n");
}

#[tokio::test]
async fn test_write_chunked_uses_hex_lengths() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&Headers::new()).await.unwrap();

    let chunk = vec![b'x'; 26];
    writer.write_chunked_body(&chunk).await.unwrap();
    writer.write_chunked_body(b"yz").await.unwrap();
    writer.write_chunked_body_done(&Headers::new()).await.unwrap();

    let out = output(writer);
    let body = out.split_once("\r\n\r\n").unwrap().1;
    assert_eq!(
        body,
        format!("1a\r\n{}\r\n2\r\nyz\r\n0\r\n\r\n", "x".repeat(26))
    );
}

#[tokio::test]
async fn test_write_empty_chunk_writes_nothing() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&Headers::new()).await.unwrap();

    assert_eq!(writer.write_chunked_body(b"").await.unwrap(), 0);
    assert_eq!(writer.state(), WriterState::Body);
    assert_eq!(output(writer), "HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_write_body_before_headers_is_out_of_order() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();

    let result = writer.write_body(b"hello").await;

    assert!(matches!(
        result,
        Err(WriteError::OutOfOrder {
            expected: WriterState::Body,
            actual: WriterState::Headers
        })
    ));
    assert_eq!(writer.state(), WriterState::Headers);
    assert_eq!(output(writer), "HTTP/1.1 200 OK\r\n");
}

#[tokio::test]
async fn test_write_headers_before_status_is_out_of_order() {
    let mut writer = ResponseWriter::new(Vec::new());
    let result = writer.write_headers(&default_headers(0)).await;

    assert!(matches!(result, Err(WriteError::OutOfOrder { .. })));
    assert_eq!(writer.state(), WriterState::StatusLine);
    assert!(output(writer).is_empty());
}

#[tokio::test]
async fn test_write_status_twice_is_out_of_order() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    let result = writer.write_status_line(StatusCode::Ok).await;

    assert!(matches!(result, Err(WriteError::OutOfOrder { .. })));
}

#[tokio::test]
async fn test_write_after_done_is_out_of_order() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&default_headers(1)).await.unwrap();
    writer.write_body(b"a").await.unwrap();

    assert!(writer.write_body(b"b").await.is_err());
    assert!(writer.write_chunked_body(b"b").await.is_err());
    assert!(writer.write_chunked_body_done(&Headers::new()).await.is_err());
    assert_eq!(writer.state(), WriterState::Done);
}

#[tokio::test]
async fn test_write_body_after_chunks_is_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&chunked_headers(&[])).await.unwrap();
    writer.write_chunked_body(b"abc").await.unwrap();

    let result = writer.write_body(b"def").await;
    assert!(matches!(result, Err(WriteError::OutOfOrder { .. })));
    assert_eq!(writer.state(), WriterState::Body);
}

#[tokio::test]
async fn test_write_full_chunked_response() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer
        .write_headers(&chunked_headers(&["X-Content-Length"]))
        .await
        .unwrap();
    writer.write_chunked_body(b"hello ").await.unwrap();
    writer.write_chunked_body(b"world").await.unwrap();

    let mut trailers = Headers::new();
    trailers.overwrite("X-Content-Length", "11");
    writer.write_chunked_body_done(&trailers).await.unwrap();

    assert_eq!(
        output(writer),
        "HTTP/1.1 200 OK\r\n\
         Connection:close\r\n\
         Content-Type:text/html\r\n\
         Transfer-Encoding:chunked\r\n\
         Trailer:X-Content-Length\r\n\
         \r\n\
         6\r\nhello \r\n\
         5\r\nworld\r\n\
         0\r\n\
         X-Content-Length:11\r\n\
         \r\n"
    );
}
