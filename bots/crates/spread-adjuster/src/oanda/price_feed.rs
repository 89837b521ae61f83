use rust_decimal::Decimal;

use crate::{
    host::TradingPair,
    oanda::{
        CandlestickGranularity,
        OandaCandlestickResponse,
    },
};

const OANDA_BASE_URL: &str = "https://api-fxpractice.oanda.com/v3";

pub struct OandaArgs {
    pub auth_token: String,
    /// The OANDA instrument name, e.g. `EUR_USD`.
    pub instrument: String,
    pub granularity: CandlestickGranularity,
    pub num_candles: u64,
}

/// OANDA names instruments `BASE_QUOTE`.
pub fn instrument_for(pair: &TradingPair) -> String {
    format!("{}_{}", pair.base, pair.quote)
}

pub async fn query_price_feed(
    oanda_args: &OandaArgs,
    client: &reqwest::Client,
) -> anyhow::Result<OandaCandlestickResponse> {
    let OandaArgs {
        auth_token,
        instrument,
        granularity,
        num_candles,
    } = oanda_args;
    let url = format!(
        "{OANDA_BASE_URL}/instruments/{instrument}/candles?count={num_candles}&granularity={granularity}"
    );
    let response = client
        .get(url)
        .bearer_auth(auth_token)
        .send()
        .await?
        .error_for_status()?;
    let text = response.text().await?;

    serde_json::from_str(text.as_str()).map_err(|e| e.into())
}

/// The mid close of the most recent candlestick in the response.
pub fn latest_mid_close(
    candlestick_response: OandaCandlestickResponse,
    expected_instrument: &str,
) -> anyhow::Result<Decimal> {
    let response_instrument = candlestick_response.instrument.as_str();
    if expected_instrument != response_instrument {
        anyhow::bail!(
            "Requested and candlestick response instrument don't match. {expected_instrument} != \
             {response_instrument}"
        );
    }

    let latest = candlestick_response
        .candles
        .iter()
        .max_by_key(|c| c.time)
        .ok_or_else(|| anyhow::anyhow!("There are zero candlesticks in the candlestick response"))?;

    let close = latest
        .mid
        .ok_or_else(|| anyhow::anyhow!("`mid` price not found in the last candlestick."))?
        .close;

    anyhow::ensure!(close > Decimal::ZERO, "Mid close must be positive: {close}");

    Ok(close)
}

#[cfg(test)]
mod tests {
    use chrono::{
        TimeZone,
        Utc,
    };
    use rust_decimal::dec;

    use super::*;
    use crate::oanda::{
        MidClose,
        OandaCandlestick,
    };

    fn candle(secs: u32, close: Decimal) -> OandaCandlestick {
        OandaCandlestick {
            time: Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, secs).unwrap(),
            mid: Some(MidClose { close }),
            complete: true,
        }
    }

    fn response(candles: Vec<OandaCandlestick>) -> OandaCandlestickResponse {
        OandaCandlestickResponse {
            instrument: "EUR_USD".into(),
            granularity: CandlestickGranularity::S5,
            candles,
        }
    }

    #[test]
    fn instrument_name() {
        let pair: TradingPair = "EUR-USD".parse().unwrap();
        assert_eq!(instrument_for(&pair), "EUR_USD");
    }

    #[test]
    fn picks_latest_candle() {
        let res = response(vec![candle(10, dec!(1.0842)), candle(5, dec!(1.0841))]);
        assert_eq!(latest_mid_close(res, "EUR_USD").unwrap(), dec!(1.0842));
    }

    #[test]
    fn rejects_bad_responses() {
        let res = response(vec![candle(5, dec!(1.0841))]);
        assert!(latest_mid_close(res, "GBP_USD").is_err());

        assert!(latest_mid_close(response(vec![]), "EUR_USD").is_err());

        let mut no_mid = candle(5, dec!(1.0841));
        no_mid.mid = None;
        assert!(latest_mid_close(response(vec![no_mid]), "EUR_USD").is_err());

        assert!(latest_mid_close(response(vec![candle(5, dec!(0))]), "EUR_USD").is_err());
    }
}
