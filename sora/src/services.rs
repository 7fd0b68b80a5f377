//! Effect handler
//!
//! Effects run as keyed tasks on the runtime's [`TaskManager`]. Spawning under
//! a key that is still running aborts the older task, so a newer request
//! replaces one in flight.

use std::sync::Arc;

use sora_core::{DeviceLocator, LocationProvider, WeatherBackend, WeatherSource};
use tui_dispatch::TaskManager;

use crate::action::Action;
use crate::effect::Effect;

#[derive(Clone)]
pub struct Services {
    source: Arc<WeatherBackend>,
    locator: Arc<LocationProvider<DeviceLocator>>,
}

impl Services {
    pub fn new(source: WeatherBackend, locator: LocationProvider<DeviceLocator>) -> Self {
        Self {
            source: Arc::new(source),
            locator: Arc::new(locator),
        }
    }

    pub fn handle(&self, effect: Effect, tasks: &mut TaskManager<Action>) {
        let key = effect.task_key();
        match effect {
            Effect::ResolveLocation { request } => {
                let locator = Arc::clone(&self.locator);
                tasks.spawn(key, async move {
                    let coordinate = locator.resolve().await;
                    Action::LocationDidResolve {
                        request,
                        coordinate,
                    }
                });
            }
            Effect::FetchWeather {
                request,
                coordinate,
            } => {
                let source = Arc::clone(&self.source);
                tasks.spawn(key, async move {
                    match source.fetch(coordinate).await {
                        Ok(observation) => Action::WeatherDidLoad {
                            request,
                            observation,
                        },
                        Err(error) => Action::WeatherDidError { request, error },
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sora_core::{ApiConfig, Coordinate, Credential, DemoMode, RequestId};
    use tokio::sync::mpsc;

    use super::*;

    fn demo_services(here: Coordinate) -> Services {
        Services::new(
            WeatherBackend::from_credential(
                &Credential::none(),
                ApiConfig::default(),
                DemoMode::Fixed,
            ),
            LocationProvider::new(DeviceLocator::Fixed(here)),
        )
    }

    async fn next_action(rx: &mut mpsc::UnboundedReceiver<Action>) -> Action {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_resolve_location_answers_with_coordinate() {
        let here = Coordinate::new(51.5, -0.12);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        demo_services(here).handle(
            Effect::ResolveLocation {
                request: RequestId::default(),
            },
            &mut tasks,
        );

        assert_eq!(
            next_action(&mut rx).await,
            Action::LocationDidResolve {
                request: RequestId::default(),
                coordinate: here,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_weather_answers_with_observation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        demo_services(Coordinate::new(0.0, 0.0)).handle(
            Effect::FetchWeather {
                request: RequestId::default(),
                coordinate: Coordinate::new(35.68, 139.65),
            },
            &mut tasks,
        );

        match next_action(&mut rx).await {
            Action::WeatherDidLoad { observation, .. } => {
                assert_eq!(observation.location_name, "東京");
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
