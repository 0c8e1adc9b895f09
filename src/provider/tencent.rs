//! Tencent LBS web service adapter
//!
//! API documentation: https://lbs.qq.com/service/webService/webServiceGuide
//!
//! Tencent speaks `lat,lng` order in parameters and structured
//! `{lat, lng}` objects in payloads, the opposite of Amap's `lng,lat`
//! strings; everything is normalized into canonical [`Coordinate`] here.

use crate::constants::api::TENCENT_URL;
use crate::error::{Error, Result};
use crate::model::{AddressInfo, Coordinate, PoiInfo, PoiPage, PoiQuery};
use crate::provider::{checked_coordinate, GeoProvider};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER: &str = "tencent";

/// Status code Tencent returns when a geocoding query matches nothing
const STATUS_NO_RESULT: i64 = 347;

/// Tencent LBS web service adapter
#[derive(Debug, Clone)]
pub struct TencentProvider {
    key: String,
    client: reqwest::Client,
}

impl TencentProvider {
    /// Create a new Tencent adapter; an empty key means "not configured"
    pub fn new(key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { key, client }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T> {
        let url = format!("{}{}", TENCENT_URL, path);
        debug!(path, "tencent request");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .query(&[("key", self.key.as_str())])
            .send()
            .await
            .map_err(|e| Error::from_transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "tencent returned HTTP status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::from_transport(PROVIDER, e))
    }
}

fn check_status(status: i64, message: Option<&str>) -> Result<()> {
    if status != 0 {
        let message = message.unwrap_or("unknown error");
        if status == STATUS_NO_RESULT {
            return Err(Error::NotFound(format!("tencent: {}", message)));
        }
        warn!(status, message, "tencent rejected request");
        return Err(Error::Provider(format!("tencent: {} ({})", message, status)));
    }
    Ok(())
}

/// Tencent serializes adcode and level sometimes as strings, sometimes as
/// numbers, depending on the endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(i64),
}

impl StringOrNumber {
    fn into_string(self) -> Option<String> {
        match self {
            StringOrNumber::Text(s) if !s.is_empty() => Some(s),
            StringOrNumber::Text(_) => None,
            StringOrNumber::Number(n) => Some(n.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
struct TcLocation {
    lng: f64,
    lat: f64,
}

#[derive(Debug, Default, Deserialize)]
struct TcAdInfo {
    #[serde(default)]
    adcode: Option<StringOrNumber>,
}

#[derive(Debug, Deserialize)]
struct GeocoderResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<GeocoderResult>,
}

#[derive(Debug, Deserialize)]
struct GeocoderResult {
    #[serde(default)]
    title: Option<String>,
    location: TcLocation,
    #[serde(default)]
    address_components: Option<TcAddressComponents>,
    #[serde(default)]
    ad_info: Option<TcAdInfo>,
    #[serde(default)]
    level: Option<StringOrNumber>,
}

#[derive(Debug, Default, Deserialize)]
struct TcAddressComponents {
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    street: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    formatted_addresses: Option<TcFormattedAddresses>,
    #[serde(default)]
    address_component: Option<TcAddressComponents>,
    #[serde(default)]
    ad_info: Option<TcAdInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct TcFormattedAddresses {
    #[serde(default)]
    recommend: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    data: Vec<TcPoi>,
}

#[derive(Debug, Deserialize)]
struct TcPoi {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    address: Option<String>,
    location: TcLocation,
    #[serde(default)]
    tel: Option<String>,
    #[serde(default, rename = "_distance")]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<TcSuggestion>,
}

#[derive(Debug, Deserialize)]
struct TcSuggestion {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    adcode: Option<StringOrNumber>,
    #[serde(default)]
    location: Option<TcLocation>,
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<IpResult>,
}

#[derive(Debug, Deserialize)]
struct IpResult {
    #[serde(default)]
    location: Option<TcLocation>,
    #[serde(default)]
    ad_info: Option<TcIpAdInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct TcIpAdInfo {
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    adcode: Option<StringOrNumber>,
}

fn extract_geocode(response: GeocoderResponse, address: &str) -> Result<AddressInfo> {
    check_status(response.status, response.message.as_deref())?;

    let result = response
        .result
        .ok_or_else(|| Error::NotFound(format!("No geocoding result for '{}'", address)))?;

    let location = checked_coordinate(PROVIDER, result.location.lng, result.location.lat)?;
    let components = result.address_components.unwrap_or_default();

    Ok(AddressInfo {
        address: non_empty(result.title).unwrap_or_else(|| address.to_string()),
        province: non_empty(components.province),
        city: non_empty(components.city),
        district: non_empty(components.district),
        township: non_empty(components.street),
        neighborhood: None,
        building: None,
        location: Some(location),
        level: result.level.and_then(StringOrNumber::into_string),
        adcode: result.ad_info.and_then(|a| a.adcode).and_then(StringOrNumber::into_string),
    })
}

fn extract_reverse(response: ReverseResponse, location: Coordinate) -> Result<AddressInfo> {
    check_status(response.status, response.message.as_deref())?;

    let result = response.result.ok_or_else(|| {
        Error::NotFound(format!(
            "No address at {},{}",
            location.longitude, location.latitude
        ))
    })?;

    let recommend = result.formatted_addresses.unwrap_or_default().recommend;
    let address = non_empty(recommend)
        .or_else(|| non_empty(result.address))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No address at {},{}",
                location.longitude, location.latitude
            ))
        })?;

    let components = result.address_component.unwrap_or_default();

    Ok(AddressInfo {
        address,
        province: non_empty(components.province),
        city: non_empty(components.city),
        district: non_empty(components.district),
        township: non_empty(components.street),
        neighborhood: None,
        building: None,
        location: Some(location),
        level: None,
        adcode: result.ad_info.and_then(|a| a.adcode).and_then(StringOrNumber::into_string),
    })
}

fn map_poi(poi: TcPoi) -> Result<PoiInfo> {
    Ok(PoiInfo {
        id: poi.id.unwrap_or_default(),
        name: poi.title.unwrap_or_default(),
        poi_type: poi.category.unwrap_or_default(),
        address: poi.address.unwrap_or_default(),
        location: checked_coordinate(PROVIDER, poi.location.lng, poi.location.lat)?,
        distance: poi.distance,
        tel: non_empty(poi.tel),
    })
}

fn extract_search(response: SearchResponse) -> Result<PoiPage> {
    check_status(response.status, response.message.as_deref())?;

    let reported = response.count;
    let pois: Vec<PoiInfo> = response.data.into_iter().map(map_poi).collect::<Result<_>>()?;

    let total = reported.unwrap_or(pois.len() as u64);
    Ok(PoiPage { pois, total })
}

fn extract_suggestions(response: SuggestionResponse) -> Result<Vec<AddressInfo>> {
    check_status(response.status, response.message.as_deref())?;

    let suggestions = response
        .data
        .into_iter()
        .filter_map(|suggestion| {
            let title = non_empty(suggestion.title)?;
            let location = suggestion
                .location
                .and_then(|l| checked_coordinate(PROVIDER, l.lng, l.lat).ok());

            Some(AddressInfo {
                address: title,
                province: non_empty(suggestion.province),
                city: non_empty(suggestion.city),
                district: non_empty(suggestion.district),
                township: None,
                neighborhood: non_empty(suggestion.address),
                building: None,
                location,
                level: None,
                adcode: suggestion.adcode.and_then(StringOrNumber::into_string),
            })
        })
        .collect();

    Ok(suggestions)
}

fn extract_ip(response: IpResponse) -> Result<AddressInfo> {
    check_status(response.status, response.message.as_deref())?;

    let result = response
        .result
        .ok_or_else(|| Error::NotFound("IP address could not be located".to_string()))?;

    let ad_info = result.ad_info.unwrap_or_default();
    let province = non_empty(ad_info.province)
        .ok_or_else(|| Error::NotFound("IP address could not be located".to_string()))?;
    let city = non_empty(ad_info.city);

    let location = result
        .location
        .map(|l| checked_coordinate(PROVIDER, l.lng, l.lat))
        .transpose()?;

    let address = match &city {
        Some(city) if *city != province => format!("{}{}", province, city),
        _ => province.clone(),
    };

    Ok(AddressInfo {
        address,
        province: Some(province),
        city,
        district: non_empty(ad_info.district),
        township: None,
        neighborhood: None,
        building: None,
        location,
        level: None,
        adcode: ad_info.adcode.and_then(StringOrNumber::into_string),
    })
}

#[async_trait]
impl GeoProvider for TencentProvider {
    fn name(&self) -> &'static str {
        "tencent"
    }

    fn description(&self) -> &'static str {
        "Tencent LBS web service API"
    }

    fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    async fn geocode(&self, address: &str) -> Result<AddressInfo> {
        let response = self
            .get_json("/ws/geocoder/v1/", vec![("address", address.to_string())])
            .await?;
        extract_geocode(response, address)
    }

    async fn reverse_geocode(&self, location: Coordinate) -> Result<AddressInfo> {
        let params = vec![(
            "location",
            format!("{},{}", location.latitude, location.longitude),
        )];
        let response = self.get_json("/ws/geocoder/v1/", params).await?;
        extract_reverse(response, location)
    }

    async fn search_poi(&self, query: &PoiQuery) -> Result<PoiPage> {
        // Search requires a region boundary; fall back to a nationwide
        // auto-extending region when the caller gave no city.
        let boundary = match &query.city {
            Some(city) => format!("region({},0)", city),
            None => "region(全国,1)".to_string(),
        };

        let params = vec![
            ("keyword", query.keyword.clone()),
            ("boundary", boundary),
            ("page_size", query.limit.to_string()),
            ("page_index", query.page.to_string()),
        ];

        let response = self.get_json("/ws/place/v1/search", params).await?;
        extract_search(response)
    }

    async fn search_address(&self, input: &str, city: Option<&str>) -> Result<Vec<AddressInfo>> {
        let mut params = vec![("keyword", input.to_string())];
        if let Some(city) = city {
            params.push(("region", city.to_string()));
        }

        let response = self.get_json("/ws/place/v1/suggestion", params).await?;
        extract_suggestions(response)
    }

    async fn nearby_poi(
        &self,
        center: Coordinate,
        radius_meters: f64,
        poi_type: Option<&str>,
    ) -> Result<Vec<PoiInfo>> {
        let boundary = format!(
            "nearby({},{},{})",
            center.latitude, center.longitude, radius_meters as u64
        );

        let mut params = vec![("boundary", boundary)];
        if let Some(poi_type) = poi_type {
            params.push(("filter", format!("category={}", poi_type)));
        } else {
            // keyword or filter is mandatory for nearby search
            params.push(("keyword", "地点".to_string()));
        }

        let response = self.get_json("/ws/place/v1/search", params).await?;
        Ok(extract_search(response)?.pois)
    }

    async fn locate_ip(&self, ip: Option<&str>) -> Result<AddressInfo> {
        let mut params = Vec::new();
        if let Some(ip) = ip {
            params.push(("ip", ip.to_string()));
        }

        let response = self.get_json("/ws/location/v1/ip", params).await?;
        extract_ip(response)
    }
}
