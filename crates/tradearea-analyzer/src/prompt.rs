use tradearea_core::{Coordinates, TRADE_AREA_RADIUS_MILES};

pub(crate) const SYSTEM_PROMPT: &str = "\
You are a commercial real estate analyst. Given a US street address and its \
coordinates, describe the surrounding trade area for a retail site selection \
report. Respond with a single JSON object and nothing else, using exactly this \
shape:
{
  \"location_name\": string,
  \"rankings\": {
    \"areaType\": { \"value\": \"Rural\" | \"Suburban\" | \"Urban\", \"description\": string },
    \"population\": { \"value\": string, \"description\": string }
  },
  \"analysis\": {
    \"demographic_profile\": string,
    \"lifestyle_trends\": string,
    \"relevant_industries\": string,
    \"physical_characteristics\": string,
    \"type_of_center\": string,
    \"nearby_businesses\": string
  }
}
Each analysis section is two to four sentences. The population value is an \
approximate range such as \"50k-100k\".";

pub(crate) fn user_prompt(address: &str, coordinates: Coordinates) -> String {
    format!(
        "Analyze the {TRADE_AREA_RADIUS_MILES}-mile trade area around {address} \
         (latitude {lat:.6}, longitude {lng:.6}).",
        lat = coordinates.latitude,
        lng = coordinates.longitude,
    )
}
