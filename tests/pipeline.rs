//! End-to-end tests that drive the whole pipeline against a local HTTP
//! server honoring Range request semantics: probe, block fetches, ZIP
//! directory reads, member inflation, and the merge join on top.

use std::io::{Cursor, Read, Write};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use census_tools::geojson::{self, FeatureCollection};
use census_tools::output::header_row;
use census_tools::{
    open_remote_archive, DataRows, GeoRecords, HttpRangeFetcher, MergeJoin, OutputShape, Progress,
    RemoteArchive, RemoteFile, TableSlice,
};

/// Serves a fixed body the way a static file server would: `Range`
/// requests get a 206 with the sliced body and a `Content-Range` header,
/// everything else gets the whole body.
struct RangeResponder(Vec<u8>);

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let total = self.0.len();
        let range = request
            .headers
            .get("range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_range);

        match range {
            Some((start, end)) if start < total => {
                let end = end.min(total - 1);
                ResponseTemplate::new(206)
                    .insert_header("content-range", format!("bytes {start}-{end}/{total}"))
                    .set_body_bytes(self.0[start..=end].to_vec())
            }
            _ => ResponseTemplate::new(200).set_body_bytes(self.0.clone()),
        }
    }
}

fn parse_range(value: &str) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn mount_archive(rt: &tokio::runtime::Runtime, server: &MockServer, route: &str, bytes: Vec<u8>) {
    rt.block_on(
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(RangeResponder(bytes))
            .mount(server),
    );
}

/// A single-member ZIP archive, the shape every census resource has.
fn archive(member_name: &str, content: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(member_name, zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(content.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// One geography record in the published fixed-width layout.
fn geo_line(fields: &[(usize, &str)]) -> String {
    let mut line = vec![b' '; 329];
    for (start, value) in fields {
        line[*start..*start + value.len()].copy_from_slice(value.as_bytes());
    }
    String::from_utf8(line).unwrap()
}

/// A state record followed by three county records, one of which is an
/// urban/rural component split that the join must skip.
fn geo_fixture() -> String {
    let lines = [
        geo_line(&[
            (8, "040"),
            (11, "00"),
            (18, "0000001"),
            (29, "31"),
            (200, "Nebraska"),
            (310, "+41500000"),
            (319, "-099750000"),
        ]),
        geo_line(&[
            (8, "050"),
            (11, "00"),
            (18, "0000002"),
            (29, "31"),
            (31, "055"),
            (200, "Douglas County"),
            (310, "+41250000"),
            (319, "-096012340"),
        ]),
        geo_line(&[
            (8, "050"),
            (11, "01"),
            (18, "0000003"),
            (29, "31"),
            (31, "055"),
            (200, "Douglas County"),
            (310, "+41250000"),
            (319, "-096012340"),
        ]),
        geo_line(&[
            (8, "050"),
            (11, "00"),
            (18, "0000004"),
            (29, "31"),
            (31, "109"),
            (200, "Lancaster County"),
            (310, "+40813000"),
            (319, "-096702200"),
        ]),
    ];
    lines.join("\r\n") + "\r\n"
}

fn data_fixture() -> String {
    [
        "uSF1,NE,000,01,0000001,1711263",
        "uSF1,NE,000,01,0000002,477613",
        "uSF1,NE,000,01,0000003,477613",
        "uSF1,NE,000,01,0000004,250291",
    ]
    .join("\r\n")
        + "\r\n"
}

const P1_SLICE: TableSlice = TableSlice {
    offset: 5,
    count: 1,
};

#[test]
fn joins_counties_over_http() {
    let (rt, server) = start_server();
    mount_archive(
        &rt,
        &server,
        "/Nebraska/negeo_uf1.zip",
        archive("negeo.uf1", &geo_fixture()),
    );
    mount_archive(
        &rt,
        &server,
        "/Nebraska/ne00001_uf1.zip",
        archive("ne00001.uf1", &data_fixture()),
    );

    let mut geo = open_remote_archive(
        &format!("{}/Nebraska/negeo_uf1.zip", server.uri()),
        Progress::Quiet,
    )
    .unwrap();
    let mut data = open_remote_archive(
        &format!("{}/Nebraska/ne00001_uf1.zip", server.uri()),
        Progress::Quiet,
    )
    .unwrap();

    let rows: Vec<_> = MergeJoin::new(
        GeoRecords::new(geo.sole_member().unwrap()),
        DataRows::new(data.sole_member().unwrap()),
        "050",
        OutputShape::Narrow,
        P1_SLICE,
    )
    .collect::<census_tools::Result<Vec<_>>>()
    .unwrap();

    assert_eq!(
        rows,
        vec![
            vec!["31", "055", "", "", "477613"],
            vec!["31", "109", "", "", "250291"],
        ]
    );

    assert_eq!(
        header_row(OutputShape::Narrow, "P1", 1).unwrap(),
        vec!["State FIPS", "County FIPS", "Tract", "Block", "P001001"]
    );
}

#[test]
fn small_blocks_reassemble_the_archive() {
    let content = geo_fixture();
    let bytes = archive("negeo.uf1", &content);
    let total = bytes.len();

    let (rt, server) = start_server();
    mount_archive(&rt, &server, "/negeo_uf1.zip", bytes);

    let url = format!("{}/negeo_uf1.zip", server.uri());
    let fetcher = HttpRangeFetcher::new(url.as_str()).unwrap();
    let file = RemoteFile::open(fetcher, 64, Progress::Quiet).unwrap();
    assert_eq!(file.len() as usize, total);

    let mut remote = RemoteArchive::open(file, &url).unwrap();
    let mut out = String::new();
    remote
        .sole_member()
        .unwrap()
        .read_to_string(&mut out)
        .unwrap();
    assert_eq!(out, content);

    // Every 64-byte block was fetched at most once.
    let requests = rt.block_on(server.received_requests()).unwrap();
    assert!(requests.len() <= 2 + total / 64);
}

#[test]
fn wide_rows_convert_to_geojson_features() {
    let mut geo =
        RemoteArchive::open(Cursor::new(archive("negeo.uf1", &geo_fixture())), "mem://geo")
            .unwrap();
    let mut data = RemoteArchive::open(
        Cursor::new(archive("ne00001.uf1", &data_fixture())),
        "mem://data",
    )
    .unwrap();

    let join = MergeJoin::new(
        GeoRecords::new(geo.sole_member().unwrap()),
        DataRows::new(data.sole_member().unwrap()),
        "050",
        OutputShape::Wide,
        P1_SLICE,
    );

    let headers = header_row(OutputShape::Wide, "P1", 1).unwrap();
    let mut features = Vec::new();
    for row in join {
        let row = row.unwrap();
        features.push(geojson::feature_from_row(&headers, &row, 5, features.len() + 1).unwrap());
    }

    let value = serde_json::to_value(FeatureCollection::new(features)).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().unwrap().len(), 2);

    let douglas = &value["features"][0];
    assert_eq!(douglas["geometry"]["type"], "Point");
    assert_eq!(douglas["geometry"]["coordinates"][0], -96.01234);
    assert_eq!(douglas["geometry"]["coordinates"][1], 41.25);
    assert_eq!(douglas["properties"]["Name"], "Douglas County");
    assert_eq!(douglas["properties"]["P001001"], "477613");
    assert_eq!(douglas["properties"]["County FIPS"], "055");
}
