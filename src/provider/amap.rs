//! Amap (Gaode) web service adapter
//!
//! API documentation: https://lbs.amap.com/api/webservice/summary
//!
//! Amap encodes "no value" as an empty JSON array where a string belongs, so
//! every optional field goes through a lenient deserializer that maps both
//! `[]` and `""` to `None`.

use crate::constants::api::AMAP_URL;
use crate::error::{Error, Result};
use crate::geomath;
use crate::model::{AddressInfo, Coordinate, PoiInfo, PoiPage, PoiQuery};
use crate::provider::{parse_lng_lat, GeoProvider};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER: &str = "amap";

/// Amap web service adapter
#[derive(Debug, Clone)]
pub struct AmapProvider {
    key: String,
    client: reqwest::Client,
}

impl AmapProvider {
    /// Create a new Amap adapter; an empty key means "not configured"
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
        let url = format!("{}{}", AMAP_URL, path);
        debug!(path, "amap request");

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
                "amap returned HTTP status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::from_transport(PROVIDER, e))
    }
}

/// Map "[]" and "" placeholders to None, keep non-empty strings
fn lenient_str<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Extract `.name` from Amap's `{name, type}` objects, tolerating the same
/// empty-array placeholders at both levels
fn lenient_named<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .get("name")
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}

fn check_status(status: &str, info: Option<&str>) -> Result<()> {
    if status != "1" {
        let info = info.unwrap_or("unknown error");
        warn!(info, "amap rejected request");
        return Err(Error::Provider(format!("amap: {}", info)));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default, deserialize_with = "lenient_str")]
    info: Option<String>,
    #[serde(default)]
    geocodes: Vec<AmapGeocode>,
}

#[derive(Debug, Deserialize)]
struct AmapGeocode {
    #[serde(default, deserialize_with = "lenient_str")]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    province: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    district: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    township: Option<String>,
    #[serde(default, deserialize_with = "lenient_named")]
    neighborhood: Option<String>,
    #[serde(default, deserialize_with = "lenient_named")]
    building: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    adcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegeoResponse {
    status: String,
    #[serde(default, deserialize_with = "lenient_str")]
    info: Option<String>,
    #[serde(default)]
    regeocode: Option<AmapRegeocode>,
}

#[derive(Debug, Deserialize)]
struct AmapRegeocode {
    #[serde(default, deserialize_with = "lenient_str")]
    formatted_address: Option<String>,
    #[serde(default, rename = "addressComponent")]
    address_component: Option<AmapAddressComponent>,
}

#[derive(Debug, Default, Deserialize)]
struct AmapAddressComponent {
    #[serde(default, deserialize_with = "lenient_str")]
    province: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    district: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    township: Option<String>,
    #[serde(default, deserialize_with = "lenient_named")]
    neighborhood: Option<String>,
    #[serde(default, deserialize_with = "lenient_named")]
    building: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    adcode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResponse {
    status: String,
    #[serde(default, deserialize_with = "lenient_str")]
    info: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    count: Option<String>,
    #[serde(default)]
    pois: Vec<AmapPoi>,
}

#[derive(Debug, Deserialize)]
struct AmapPoi {
    #[serde(default, deserialize_with = "lenient_str")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_str")]
    poi_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    tel: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    distance: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TipsResponse {
    status: String,
    #[serde(default, deserialize_with = "lenient_str")]
    info: Option<String>,
    #[serde(default)]
    tips: Vec<AmapTip>,
}

#[derive(Debug, Deserialize)]
struct AmapTip {
    #[serde(default, deserialize_with = "lenient_str")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    district: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    adcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    status: String,
    #[serde(default, deserialize_with = "lenient_str")]
    info: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    province: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    adcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_str")]
    rectangle: Option<String>,
}

fn extract_geocode(response: GeocodeResponse, address: &str) -> Result<AddressInfo> {
    check_status(&response.status, response.info.as_deref())?;

    let geocode = response
        .geocodes
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("No geocoding result for '{}'", address)))?;

    let location = geocode
        .location
        .as_deref()
        .map(|raw| parse_lng_lat(PROVIDER, raw))
        .transpose()?;

    Ok(AddressInfo {
        address: geocode.formatted_address.unwrap_or_default(),
        province: geocode.province,
        city: geocode.city,
        district: geocode.district,
        township: geocode.township,
        neighborhood: geocode.neighborhood,
        building: geocode.building,
        location,
        level: geocode.level,
        adcode: geocode.adcode,
    })
}

fn extract_regeo(response: RegeoResponse, location: Coordinate) -> Result<AddressInfo> {
    check_status(&response.status, response.info.as_deref())?;

    let regeocode = response.regeocode.ok_or_else(|| {
        Error::NotFound(format!(
            "No address at {},{}",
            location.longitude, location.latitude
        ))
    })?;

    let address = regeocode.formatted_address.ok_or_else(|| {
        Error::NotFound(format!(
            "No address at {},{}",
            location.longitude, location.latitude
        ))
    })?;

    let component = regeocode.address_component.unwrap_or_default();

    Ok(AddressInfo {
        address,
        province: component.province,
        city: component.city,
        district: component.district,
        township: component.township,
        neighborhood: component.neighborhood,
        building: component.building,
        location: Some(location),
        level: None,
        adcode: component.adcode,
    })
}

fn map_poi(poi: AmapPoi) -> Result<PoiInfo> {
    let raw_location = poi
        .location
        .ok_or_else(|| Error::Provider("amap: POI entry is missing a location".to_string()))?;

    Ok(PoiInfo {
        id: poi.id.unwrap_or_default(),
        name: poi.name.unwrap_or_default(),
        poi_type: poi.poi_type.unwrap_or_default(),
        address: poi.address.unwrap_or_default(),
        location: parse_lng_lat(PROVIDER, &raw_location)?,
        distance: poi.distance.and_then(|d| d.parse().ok()),
        tel: poi.tel,
    })
}

fn extract_pois(response: PlaceResponse) -> Result<PoiPage> {
    check_status(&response.status, response.info.as_deref())?;

    let reported = response.count.and_then(|c| c.parse().ok());
    let pois: Vec<PoiInfo> = response
        .pois
        .into_iter()
        .map(map_poi)
        .collect::<Result<_>>()?;

    let total = reported.unwrap_or(pois.len() as u64);
    Ok(PoiPage { pois, total })
}

fn extract_tips(response: TipsResponse) -> Result<Vec<AddressInfo>> {
    check_status(&response.status, response.info.as_deref())?;

    // Tips without a name or with a malformed location are suggestions the
    // provider could not fully resolve; skip rather than fail the whole list.
    let suggestions = response
        .tips
        .into_iter()
        .filter_map(|tip| {
            let name = tip.name?;
            let location = tip
                .location
                .as_deref()
                .and_then(|raw| parse_lng_lat(PROVIDER, raw).ok());

            Some(AddressInfo {
                address: name,
                province: None,
                city: None,
                district: tip.district,
                township: None,
                neighborhood: tip.address,
                building: None,
                location,
                level: None,
                adcode: tip.adcode,
            })
        })
        .collect();

    Ok(suggestions)
}

fn extract_ip(response: IpResponse) -> Result<AddressInfo> {
    check_status(&response.status, response.info.as_deref())?;

    let province = response
        .province
        .ok_or_else(|| Error::NotFound("IP address could not be located".to_string()))?;

    // The IP endpoint returns a bounding rectangle, not a point; use its
    // centroid as the representative location.
    let location = response.rectangle.as_deref().and_then(|rectangle| {
        let corners: Vec<Coordinate> = rectangle
            .split(';')
            .filter_map(|corner| parse_lng_lat(PROVIDER, corner).ok())
            .collect();
        geomath::centroid(&corners).ok()
    });

    let address = match &response.city {
        Some(city) if *city != province => format!("{}{}", province, city),
        _ => province.clone(),
    };

    Ok(AddressInfo {
        address,
        province: Some(province),
        city: response.city,
        district: None,
        township: None,
        neighborhood: None,
        building: None,
        location,
        level: None,
        adcode: response.adcode,
    })
}

#[async_trait]
impl GeoProvider for AmapProvider {
    fn name(&self) -> &'static str {
        "amap"
    }

    fn description(&self) -> &'static str {
        "Amap (Gaode) web service API"
    }

    fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    async fn geocode(&self, address: &str) -> Result<AddressInfo> {
        let response = self
            .get_json("/v3/geocode/geo", vec![("address", address.to_string())])
            .await?;
        extract_geocode(response, address)
    }

    async fn reverse_geocode(&self, location: Coordinate) -> Result<AddressInfo> {
        let params = vec![
            (
                "location",
                format!("{},{}", location.longitude, location.latitude),
            ),
            ("extensions", "base".to_string()),
        ];
        let response = self.get_json("/v3/geocode/regeo", params).await?;
        extract_regeo(response, location)
    }

    async fn search_poi(&self, query: &PoiQuery) -> Result<PoiPage> {
        let mut params = vec![
            ("keywords", query.keyword.clone()),
            ("offset", query.limit.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(city) = &query.city {
            params.push(("city", city.clone()));
        }

        let response = self.get_json("/v3/place/text", params).await?;
        extract_pois(response)
    }

    async fn search_address(&self, input: &str, city: Option<&str>) -> Result<Vec<AddressInfo>> {
        let mut params = vec![("keywords", input.to_string())];
        if let Some(city) = city {
            params.push(("city", city.to_string()));
        }

        let response = self.get_json("/v3/assistant/inputtips", params).await?;
        extract_tips(response)
    }

    async fn nearby_poi(
        &self,
        center: Coordinate,
        radius_meters: f64,
        poi_type: Option<&str>,
    ) -> Result<Vec<PoiInfo>> {
        let mut params = vec![
            (
                "location",
                format!("{},{}", center.longitude, center.latitude),
            ),
            ("radius", format!("{}", radius_meters as u64)),
        ];
        if let Some(poi_type) = poi_type {
            params.push(("types", poi_type.to_string()));
        }

        let response = self.get_json("/v3/place/around", params).await?;
        Ok(extract_pois(response)?.pois)
    }

    async fn locate_ip(&self, ip: Option<&str>) -> Result<AddressInfo> {
        let mut params = Vec::new();
        if let Some(ip) = ip {
            params.push(("ip", ip.to_string()));
        }

        let response = self.get_json("/v3/ip", params).await?;
        extract_ip(response)
    }
}
