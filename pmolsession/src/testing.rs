//! Lien scripté partagé par les tests de session et d'API.

use crate::link::{DeviceConnection, DeviceLink};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Implémentation de [`DeviceLink`] dont les résultats d'ouverture et
/// d'envoi sont scriptés à l'avance. Tout ce qui n'est pas scripté réussit.
#[derive(Clone, Default)]
pub struct ScriptedLink {
    open_plan: Arc<Mutex<VecDeque<bool>>>,
    send_plan: Arc<Mutex<VecDeque<bool>>>,
    opens: Arc<Mutex<u32>>,
    closes: Arc<Mutex<u32>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripte les résultats des prochains `open()` (true = succès).
    pub fn plan_opens(&self, results: impl IntoIterator<Item = bool>) {
        self.open_plan.lock().unwrap().extend(results);
    }

    /// Scripte les résultats des prochains envois (true = succès).
    pub fn plan_sends(&self, results: impl IntoIterator<Item = bool>) {
        self.send_plan.lock().unwrap().extend(results);
    }

    pub fn open_count(&self) -> u32 {
        *self.opens.lock().unwrap()
    }

    pub fn close_count(&self) -> u32 {
        *self.closes.lock().unwrap()
    }

    /// Niveaux natifs de toutes les tentatives d'envoi, échecs compris.
    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceLink for ScriptedLink {
    async fn open(&self, endpoint: &str) -> Result<Box<dyn DeviceConnection>> {
        *self.opens.lock().unwrap() += 1;
        let ok = self.open_plan.lock().unwrap().pop_front().unwrap_or(true);
        if !ok {
            return Err(anyhow!("scripted open failure for {endpoint}"));
        }
        Ok(Box::new(ScriptedConnection {
            send_plan: Arc::clone(&self.send_plan),
            closes: Arc::clone(&self.closes),
            sent: Arc::clone(&self.sent),
        }))
    }
}

struct ScriptedConnection {
    send_plan: Arc<Mutex<VecDeque<bool>>>,
    closes: Arc<Mutex<u32>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

#[async_trait]
impl DeviceConnection for ScriptedConnection {
    async fn send_brightness(&mut self, native: u8) -> Result<()> {
        self.sent.lock().unwrap().push(native);
        let ok = self.send_plan.lock().unwrap().pop_front().unwrap_or(true);
        if !ok {
            return Err(anyhow!("scripted send failure"));
        }
        Ok(())
    }

    async fn close(&mut self) {
        *self.closes.lock().unwrap() += 1;
    }
}
