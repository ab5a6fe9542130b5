// MinIO s3verify: conformance tester for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An in-memory S3 endpoint served by wiremock. Behaves like a conforming
//! server unless told otherwise through [`Faults`].

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use s3verify::s3::http::BaseUrl;
use s3verify::s3::utils::{
    UtcTime, from_http_header_value, md5_hex, md5sum_hash, sha256_hash, to_http_header_value,
    trim_etag, utc_now,
};
use s3verify::verify::config::Config;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ACCESS_KEY: &str = "s3verify-access";
pub const SECRET_KEY: &str = "s3verify-secret";

const PRECONDITION_MESSAGE: &str = "At least one of the pre-conditions you specified did not hold";

/// Ways the fake server departs from S3 behavior
#[derive(Clone, Debug, Default)]
pub struct Faults {
    /// PutObject answers 500 InternalError
    pub fail_put: bool,
    /// GET and HEAD ignore If-Match
    pub ignore_if_match: bool,
    /// Upper-case bucket names are accepted
    pub accept_invalid_bucket_name: bool,
    /// Failed copy preconditions carry a non-standard message
    pub wrong_copy_message: bool,
    /// Listing page size; defaults to 1000
    pub page_size: Option<usize>,
    /// Delay applied to every object GET
    pub slow_get: Option<Duration>,
}

struct Object {
    body: Vec<u8>,
    etag: String,
    last_modified: UtcTime,
}

struct Bucket {
    created: UtcTime,
    objects: BTreeMap<String, Object>,
}

struct Upload {
    bucket: String,
    key: String,
    initiated: UtcTime,
    parts: BTreeMap<u16, Object>,
}

#[derive(Default)]
struct State {
    buckets: BTreeMap<String, Bucket>,
    uploads: BTreeMap<String, Upload>,
    next_upload: u64,
}

#[derive(Clone, Default)]
pub struct FakeS3 {
    state: Arc<Mutex<State>>,
    faults: Faults,
}

fn now() -> UtcTime {
    DateTime::<Utc>::from_timestamp(utc_now().timestamp(), 0).unwrap()
}

fn iso(t: UtcTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn reply(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("Date", to_http_header_value(utc_now()))
        .insert_header("Server", "FakeS3")
        .insert_header("x-amz-request-id", "17B5F2C4D3E2A1F0")
}

fn xml(status: u16, body: String) -> ResponseTemplate {
    reply(status).set_body_raw(
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}"),
        "application/xml",
    )
}

fn error(status: u16, code: &str, message: &str, resource: &str, head: bool) -> ResponseTemplate {
    if head {
        return reply(status);
    }
    xml(
        status,
        format!(
            "<Error><Code>{code}</Code><Message>{message}</Message>\
             <Resource>{resource}</Resource><RequestId>17B5F2C4D3E2A1F0</RequestId>\
             <HostId>fake</HostId></Error>"
        ),
    )
}

fn with_object_headers(resp: ResponseTemplate, object: &Object) -> ResponseTemplate {
    resp.insert_header("ETag", format!("\"{}\"", object.etag))
        .insert_header("Last-Modified", to_http_header_value(object.last_modified))
        .insert_header("Accept-Ranges", "bytes")
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_date(value: &str) -> Option<UtcTime> {
    from_http_header_value(value).ok()
}

/// Outcome of evaluating conditional headers against an object
enum Precondition {
    Proceed,
    NotModified,
    Failed,
}

fn evaluate(
    object: &Object,
    if_match: Option<&str>,
    if_unmodified_since: Option<&str>,
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
) -> Precondition {
    if let Some(v) = if_match
        && trim_etag(v) != object.etag
    {
        return Precondition::Failed;
    }
    if let Some(t) = if_unmodified_since.and_then(parse_date)
        && object.last_modified > t
    {
        return Precondition::Failed;
    }
    if let Some(v) = if_none_match {
        if trim_etag(v) == object.etag {
            return Precondition::NotModified;
        }
    } else if let Some(t) = if_modified_since.and_then(parse_date)
        && object.last_modified <= t
    {
        return Precondition::NotModified;
    }
    Precondition::Proceed
}

fn parse_range(value: &str, size: usize) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let (start, end): (usize, usize) = (start.parse().ok()?, end.parse().ok()?);
    (start <= end && start < size).then_some((start, end.min(size - 1)))
}

impl FakeS3 {
    pub fn new(faults: Faults) -> Self {
        Self {
            state: Arc::default(),
            faults,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.state().buckets.keys().cloned().collect()
    }

    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        self.state()
            .buckets
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn upload_count(&self) -> usize {
        self.state().uploads.len()
    }

    fn handle(&self, req: &Request) -> ResponseTemplate {
        let head = req.method == http::Method::HEAD;
        let auth = header(req, "authorization").unwrap_or_default();
        if !auth.starts_with(&format!("AWS4-HMAC-SHA256 Credential={ACCESS_KEY}/")) {
            return error(403, "AccessDenied", "Access Denied.", req.url.path(), head);
        }
        if header(req, "x-amz-content-sha256") != Some(sha256_hash(&req.body).as_str()) {
            return error(
                400,
                "XAmzContentSHA256Mismatch",
                "The provided 'x-amz-content-sha256' header does not match what was computed.",
                req.url.path(),
                head,
            );
        }
        if let Some(md5) = header(req, "content-md5")
            && md5 != md5sum_hash(&req.body)
        {
            return error(
                400,
                "BadDigest",
                "The Content-Md5 you specified did not match what we received.",
                req.url.path(),
                head,
            );
        }

        let query: HashMap<String, String> = req.url.query_pairs().into_owned().collect();
        let path = req.url.path().trim_start_matches('/');
        let (bucket, key) = match path.split_once('/') {
            Some((b, k)) => (b.to_string(), k.to_string()),
            None => (path.to_string(), String::new()),
        };

        if bucket.is_empty() {
            return self.list_buckets();
        }
        if key.is_empty() {
            return self.bucket_request(req, &bucket, &query);
        }
        self.object_request(req, &bucket, &key, &query)
    }

    fn list_buckets(&self) -> ResponseTemplate {
        let buckets: String = self
            .state()
            .buckets
            .iter()
            .map(|(name, b)| {
                format!(
                    "<Bucket><Name>{name}</Name><CreationDate>{}</CreationDate></Bucket>",
                    iso(b.created)
                )
            })
            .collect();
        xml(
            200,
            format!(
                "<ListAllMyBucketsResult><Owner><ID>fake</ID><DisplayName>fake</DisplayName>\
                 </Owner><Buckets>{buckets}</Buckets></ListAllMyBucketsResult>"
            ),
        )
    }

    fn bucket_request(
        &self,
        req: &Request,
        bucket: &str,
        query: &HashMap<String, String>,
    ) -> ResponseTemplate {
        let head = req.method == http::Method::HEAD;
        let resource = format!("/{bucket}");
        let mut state = self.state();

        if req.method == http::Method::PUT {
            let valid = !bucket.chars().any(|c| c.is_ascii_uppercase());
            if !valid && !self.faults.accept_invalid_bucket_name {
                return error(
                    400,
                    "InvalidBucketName",
                    "The specified bucket is not valid.",
                    &resource,
                    false,
                );
            }
            if state.buckets.contains_key(bucket) {
                return error(
                    409,
                    "BucketAlreadyOwnedByYou",
                    "Your previous request to create the named bucket succeeded and you already own it.",
                    &resource,
                    false,
                );
            }
            state.buckets.insert(
                bucket.to_string(),
                Bucket {
                    created: now(),
                    objects: BTreeMap::new(),
                },
            );
            return reply(200).insert_header("Location", resource);
        }

        let Some(b) = state.buckets.get(bucket) else {
            return error(
                404,
                "NoSuchBucket",
                "The specified bucket does not exist",
                &resource,
                head,
            );
        };

        match req.method.as_str() {
            "HEAD" => reply(200),
            "DELETE" => {
                if !b.objects.is_empty() {
                    return error(
                        409,
                        "BucketNotEmpty",
                        "The bucket you tried to delete is not empty",
                        &resource,
                        false,
                    );
                }
                state.buckets.remove(bucket);
                reply(204)
            }
            "GET" if query.contains_key("location") => xml(
                200,
                "<LocationConstraint xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"></LocationConstraint>"
                    .into(),
            ),
            "GET" if query.contains_key("uploads") => {
                let prefix = query.get("prefix").cloned().unwrap_or_default();
                let uploads: String = state
                    .uploads
                    .iter()
                    .filter(|(_, u)| u.bucket == bucket && u.key.starts_with(&prefix))
                    .map(|(id, u)| {
                        format!(
                            "<Upload><Key>{}</Key><UploadId>{id}</UploadId>\
                             <Initiated>{}</Initiated></Upload>",
                            u.key,
                            iso(u.initiated)
                        )
                    })
                    .collect();
                xml(
                    200,
                    format!(
                        "<ListMultipartUploadsResult><Bucket>{bucket}</Bucket>\
                         <Prefix>{prefix}</Prefix><IsTruncated>false</IsTruncated>\
                         {uploads}</ListMultipartUploadsResult>"
                    ),
                )
            }
            "GET" => self.list_objects(bucket, b, query),
            _ => error(405, "MethodNotAllowed", "Method not allowed", &resource, false),
        }
    }

    fn list_objects(
        &self,
        name: &str,
        bucket: &Bucket,
        query: &HashMap<String, String>,
    ) -> ResponseTemplate {
        let v2 = query.get("list-type").map(String::as_str) == Some("2");
        let prefix = query.get("prefix").cloned().unwrap_or_default();
        let after = if v2 {
            query.get("continuation-token")
        } else {
            query.get("marker")
        }
        .cloned()
        .unwrap_or_default();
        let page_size = self.faults.page_size.unwrap_or(1000);

        let matching: Vec<(&String, &Object)> = bucket
            .objects
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix) && k.as_str() > after.as_str())
            .collect();
        let truncated = matching.len() > page_size;
        let page = &matching[..matching.len().min(page_size)];

        let contents: String = page
            .iter()
            .map(|(k, o)| {
                format!(
                    "<Contents><Key>{k}</Key><LastModified>{}</LastModified>\
                     <ETag>&quot;{}&quot;</ETag><Size>{}</Size>\
                     <StorageClass>STANDARD</StorageClass></Contents>",
                    iso(o.last_modified),
                    o.etag,
                    o.body.len()
                )
            })
            .collect();
        let mut extra = String::new();
        if v2 {
            extra.push_str(&format!("<KeyCount>{}</KeyCount>", page.len()));
            if truncated && let Some((last, _)) = page.last() {
                extra.push_str(&format!(
                    "<NextContinuationToken>{last}</NextContinuationToken>"
                ));
            }
        } else {
            extra.push_str(&format!("<Marker>{after}</Marker>"));
        }
        xml(
            200,
            format!(
                "<ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                 <Name>{name}</Name><Prefix>{prefix}</Prefix>{extra}\
                 <MaxKeys>{page_size}</MaxKeys><IsTruncated>{truncated}</IsTruncated>\
                 {contents}</ListBucketResult>"
            ),
        )
    }

    fn object_request(
        &self,
        req: &Request,
        bucket: &str,
        key: &str,
        query: &HashMap<String, String>,
    ) -> ResponseTemplate {
        let head = req.method == http::Method::HEAD;
        let resource = format!("/{bucket}/{key}");
        if !self.state().buckets.contains_key(bucket) {
            return error(
                404,
                "NoSuchBucket",
                "The specified bucket does not exist",
                &resource,
                head,
            );
        }

        if let Some(upload_id) = query.get("uploadId") {
            return self.upload_request(req, bucket, key, upload_id, query, &resource);
        }

        match req.method.as_str() {
            "POST" if query.contains_key("uploads") => self.create_upload(bucket, key),
            "PUT" if header(req, "x-amz-copy-source").is_some() => {
                self.copy_object(req, bucket, key, &resource)
            }
            "PUT" => {
                if self.faults.fail_put {
                    return error(
                        500,
                        "InternalError",
                        "We encountered an internal error, please try again.",
                        &resource,
                        false,
                    );
                }
                let object = Object {
                    etag: md5_hex(&req.body),
                    body: req.body.clone(),
                    last_modified: now(),
                };
                let resp = reply(200).insert_header("ETag", format!("\"{}\"", object.etag));
                self.insert_object(bucket, key, object);
                resp
            }
            "DELETE" => {
                if let Some(b) = self.state().buckets.get_mut(bucket) {
                    b.objects.remove(key);
                }
                reply(204)
            }
            "GET" | "HEAD" => self.read_object(req, bucket, key, &resource),
            _ => error(405, "MethodNotAllowed", "Method not allowed", &resource, false),
        }
    }

    fn insert_object(&self, bucket: &str, key: &str, object: Object) {
        if let Some(b) = self.state().buckets.get_mut(bucket) {
            b.objects.insert(key.to_string(), object);
        }
    }

    fn read_object(&self, req: &Request, bucket: &str, key: &str, resource: &str) -> ResponseTemplate {
        let head = req.method == http::Method::HEAD;
        let state = self.state();
        let Some(object) = state.buckets.get(bucket).and_then(|b| b.objects.get(key)) else {
            return error(404, "NoSuchKey", "The specified key does not exist.", resource, head);
        };

        let if_match = if self.faults.ignore_if_match {
            None
        } else {
            header(req, "if-match")
        };
        match evaluate(
            object,
            if_match,
            header(req, "if-unmodified-since"),
            header(req, "if-none-match"),
            header(req, "if-modified-since"),
        ) {
            Precondition::Failed => {
                return error(
                    412,
                    "PreconditionFailed",
                    PRECONDITION_MESSAGE,
                    resource,
                    head,
                );
            }
            Precondition::NotModified => return with_object_headers(reply(304), object),
            Precondition::Proceed => {}
        }

        if head {
            return with_object_headers(reply(200), object)
                .insert_header("Content-Length", object.body.len().to_string());
        }

        let resp = match header(req, "range") {
            Some(range) => match parse_range(range, object.body.len()) {
                Some((start, end)) => with_object_headers(reply(206), object)
                    .insert_header(
                        "Content-Range",
                        format!("bytes {start}-{end}/{}", object.body.len()),
                    )
                    .set_body_bytes(object.body[start..=end].to_vec()),
                None => {
                    return error(
                        416,
                        "InvalidRange",
                        "The requested range is not satisfiable",
                        resource,
                        false,
                    );
                }
            },
            None => with_object_headers(reply(200), object).set_body_bytes(object.body.clone()),
        };
        match self.faults.slow_get {
            Some(delay) => resp.set_delay(delay),
            None => resp,
        }
    }

    fn copy_object(&self, req: &Request, bucket: &str, key: &str, resource: &str) -> ResponseTemplate {
        let source = header(req, "x-amz-copy-source").unwrap_or_default();
        let source = source.trim_start_matches('/');
        let Some((src_bucket, src_key)) = source.split_once('/') else {
            return error(400, "InvalidArgument", "Copy Source must mention the source bucket and key", resource, false);
        };

        let copy = {
            let state = self.state();
            let Some(src) = state.buckets.get(src_bucket).and_then(|b| b.objects.get(src_key)) else {
                return error(404, "NoSuchKey", "The specified key does not exist.", resource, false);
            };
            match evaluate(
                src,
                header(req, "x-amz-copy-source-if-match"),
                header(req, "x-amz-copy-source-if-unmodified-since"),
                header(req, "x-amz-copy-source-if-none-match"),
                header(req, "x-amz-copy-source-if-modified-since"),
            ) {
                Precondition::Proceed => {}
                Precondition::NotModified | Precondition::Failed => {
                    let message = if self.faults.wrong_copy_message {
                        "Precondition failed"
                    } else {
                        PRECONDITION_MESSAGE
                    };
                    return error(412, "PreconditionFailed", message, resource, false);
                }
            }
            Object {
                body: src.body.clone(),
                etag: src.etag.clone(),
                last_modified: now(),
            }
        };

        let body = format!(
            "<CopyObjectResult><LastModified>{}</LastModified>\
             <ETag>&quot;{}&quot;</ETag></CopyObjectResult>",
            iso(copy.last_modified),
            copy.etag
        );
        self.insert_object(bucket, key, copy);
        xml(200, body)
    }

    fn create_upload(&self, bucket: &str, key: &str) -> ResponseTemplate {
        let mut state = self.state();
        state.next_upload += 1;
        let upload_id = format!("fake-upload-{}", state.next_upload);
        state.uploads.insert(
            upload_id.clone(),
            Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                initiated: now(),
                parts: BTreeMap::new(),
            },
        );
        xml(
            200,
            format!(
                "<InitiateMultipartUploadResult><Bucket>{bucket}</Bucket><Key>{key}</Key>\
                 <UploadId>{upload_id}</UploadId></InitiateMultipartUploadResult>"
            ),
        )
    }

    fn upload_request(
        &self,
        req: &Request,
        bucket: &str,
        key: &str,
        upload_id: &str,
        query: &HashMap<String, String>,
        resource: &str,
    ) -> ResponseTemplate {
        let mut state = self.state();
        let Some(upload) = state
            .uploads
            .get_mut(upload_id)
            .filter(|u| u.bucket == bucket && u.key == key)
        else {
            return error(
                404,
                "NoSuchUpload",
                "The specified multipart upload does not exist.",
                resource,
                false,
            );
        };

        match req.method.as_str() {
            "PUT" => {
                let Some(number) = query.get("partNumber").and_then(|n| n.parse().ok()) else {
                    return error(400, "InvalidArgument", "Part number must be an integer", resource, false);
                };
                let part = Object {
                    etag: md5_hex(&req.body),
                    body: req.body.clone(),
                    last_modified: now(),
                };
                let resp = reply(200).insert_header("ETag", format!("\"{}\"", part.etag));
                upload.parts.insert(number, part);
                resp
            }
            "GET" => {
                let parts: String = upload
                    .parts
                    .iter()
                    .map(|(n, p)| {
                        format!(
                            "<Part><PartNumber>{n}</PartNumber><LastModified>{}</LastModified>\
                             <ETag>&quot;{}&quot;</ETag><Size>{}</Size></Part>",
                            iso(p.last_modified),
                            p.etag,
                            p.body.len()
                        )
                    })
                    .collect();
                xml(
                    200,
                    format!(
                        "<ListPartsResult><Bucket>{bucket}</Bucket><Key>{key}</Key>\
                         <UploadId>{upload_id}</UploadId><IsTruncated>false</IsTruncated>\
                         {parts}</ListPartsResult>"
                    ),
                )
            }
            "DELETE" => {
                state.uploads.remove(upload_id);
                reply(204)
            }
            "POST" => {
                let Some(upload) = state.uploads.remove(upload_id) else {
                    return error(404, "NoSuchUpload", "The specified multipart upload does not exist.", resource, false);
                };
                let mut body = Vec::new();
                let mut etags = String::new();
                for part in upload.parts.values() {
                    body.extend_from_slice(&part.body);
                    etags.push_str(&part.etag);
                }
                let object = Object {
                    etag: format!("{}-{}", md5_hex(etags.as_bytes()), upload.parts.len()),
                    body,
                    last_modified: now(),
                };
                let etag = object.etag.clone();
                if let Some(b) = state.buckets.get_mut(bucket) {
                    b.objects.insert(key.to_string(), object);
                }
                xml(
                    200,
                    format!(
                        "<CompleteMultipartUploadResult><Location>http://fake/{bucket}/{key}</Location>\
                         <Bucket>{bucket}</Bucket><Key>{key}</Key>\
                         <ETag>&quot;{etag}&quot;</ETag></CompleteMultipartUploadResult>"
                    ),
                )
            }
            _ => error(405, "MethodNotAllowed", "Method not allowed", resource, false),
        }
    }
}

impl Respond for FakeS3 {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.handle(request)
    }
}

/// A running fake endpoint and a handle on its contents
pub struct TestContext {
    pub server: MockServer,
    pub s3: FakeS3,
}

impl TestContext {
    pub async fn start(faults: Faults) -> Self {
        let server = MockServer::start().await;
        let s3 = FakeS3::new(faults);
        Mock::given(any())
            .respond_with(s3.clone())
            .mount(&server)
            .await;
        Self { server, s3 }
    }

    pub fn endpoint(&self) -> BaseUrl {
        self.server.uri().parse().unwrap()
    }

    /// Small, fast configuration pointed at the fake endpoint
    pub fn config(&self) -> Config {
        Config::builder()
            .endpoint(self.endpoint())
            .access_key(ACCESS_KEY)
            .secret_key(SECRET_KEY)
            .object_count(3)
            .max_object_size(4 * 1024)
            .concurrency(4)
            .build()
    }
}
