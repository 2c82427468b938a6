// src/services/wizard.rs
//
// El controlador del wizard de reserva del lado cliente: cuatro pasos
// (identidad → servicio → barbero y horario → confirmación) sobre un
// borrador en memoria. Nada se persiste hasta la confirmación explícita;
// abandonar descarta el borrador. Avanzar exige completar los pasos
// anteriores, volver atrás a corregir siempre está permitido.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalogo,
        reserva::{BarberiaId, Reserva, ServicioPersonalizado, SolicitudReserva},
    },
    services::reserva_service::{Disponibilidad, ReservaService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PasoWizard {
    Identidad,
    Servicio,
    Horario,
    Confirmacion,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorradorWizard {
    pub id: Uuid,
    // Hasta dónde llegó el cliente; los pasos posteriores están cerrados.
    pub paso: PasoWizard,

    pub cliente: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub barberia: Option<BarberiaId>,

    pub servicio: Option<String>,
    pub servicio_personalizado: ServicioPersonalizado,

    pub barbero: Option<String>,
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub notas: Option<String>,
}

impl BorradorWizard {
    fn nuevo(id: Uuid) -> Self {
        Self {
            id,
            paso: PasoWizard::Identidad,
            cliente: None,
            telefono: None,
            email: None,
            barberia: None,
            servicio: None,
            servicio_personalizado: ServicioPersonalizado::default(),
            barbero: None,
            fecha: None,
            hora: None,
            notas: None,
        }
    }
}

#[derive(Clone)]
pub struct WizardService {
    borradores: Arc<RwLock<HashMap<Uuid, BorradorWizard>>>,
    reservas: ReservaService,
}

impl WizardService {
    pub fn new(reservas: ReservaService) -> Self {
        Self {
            borradores: Arc::new(RwLock::new(HashMap::new())),
            reservas,
        }
    }

    pub async fn start(&self) -> BorradorWizard {
        let id = Uuid::new_v4();
        let borrador = BorradorWizard::nuevo(id);
        self.borradores.write().await.insert(id, borrador.clone());
        borrador
    }

    pub async fn get(&self, id: Uuid) -> Result<BorradorWizard, AppError> {
        self.borradores
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    // Paso 1: datos de contacto y barbería. La barbería define el plantel
    // de barberos de los pasos siguientes, así que cambiarla descarta el
    // barbero ya elegido.
    pub async fn set_identidad(
        &self,
        id: Uuid,
        cliente: String,
        telefono: String,
        email: Option<String>,
        barberia: BarberiaId,
    ) -> Result<BorradorWizard, AppError> {
        if cliente.trim().is_empty() {
            return Err(AppError::Validation("Falta el campo cliente".into()));
        }
        if telefono.trim().is_empty() {
            return Err(AppError::Validation("Falta el campo telefono".into()));
        }

        let mut borradores = self.borradores.write().await;
        let borrador = borradores.get_mut(&id).ok_or(AppError::NotFound)?;

        if borrador.barberia.is_some() && borrador.barberia != Some(barberia) {
            borrador.barbero = None;
            borrador.fecha = None;
            borrador.hora = None;
            borrador.paso = PasoWizard::Servicio;
        }

        borrador.cliente = Some(cliente);
        borrador.telefono = Some(telefono);
        borrador.email = email;
        borrador.barberia = Some(barberia);
        borrador.paso = borrador.paso.max(PasoWizard::Servicio);
        Ok(borrador.clone())
    }

    // Paso 2: servicio base (fija la duración por defecto) y
    // personalización opcional.
    pub async fn set_servicio(
        &self,
        id: Uuid,
        servicio: String,
        personalizado: Option<ServicioPersonalizado>,
    ) -> Result<BorradorWizard, AppError> {
        if servicio.trim().is_empty() {
            return Err(AppError::Validation("Falta el campo servicio".into()));
        }

        let mut borradores = self.borradores.write().await;
        let borrador = borradores.get_mut(&id).ok_or(AppError::NotFound)?;
        if borrador.paso < PasoWizard::Servicio {
            return Err(AppError::Validation(
                "Completa primero el paso de identidad".into(),
            ));
        }

        borrador.servicio = Some(servicio);
        borrador.servicio_personalizado = personalizado.unwrap_or_default();
        borrador.paso = borrador.paso.max(PasoWizard::Horario);
        Ok(borrador.clone())
    }

    // Paso 3: barbero del plantel de la barbería elegida, fecha y hora.
    // Corre el chequeo de disponibilidad; si la franja choca, el borrador
    // no avanza y se devuelven las alternativas sugeridas.
    pub async fn set_horario(
        &self,
        id: Uuid,
        barbero: String,
        fecha: String,
        hora: String,
    ) -> Result<(BorradorWizard, Disponibilidad), AppError> {
        let (barberia, servicio) = {
            let borradores = self.borradores.read().await;
            let borrador = borradores.get(&id).ok_or(AppError::NotFound)?;
            if borrador.paso < PasoWizard::Horario {
                return Err(AppError::Validation(
                    "Completa primero los pasos de identidad y servicio".into(),
                ));
            }
            (borrador.barberia, borrador.servicio.clone())
        };

        let barberia = barberia
            .ok_or_else(|| AppError::Validation("Falta el campo barberia".into()))?;
        let plantel = catalogo::barberos_de(barberia);
        let elegido = plantel
            .iter()
            .find(|b| b.nombre == barbero)
            .ok_or_else(|| {
                AppError::Validation(format!("{barbero} no atiende en la barbería {barberia}"))
            })?;
        if !elegido.disponible {
            return Err(AppError::Validation(format!(
                "{barbero} no está tomando citas por ahora"
            )));
        }

        let duracion = catalogo::duracion_de(servicio.as_deref().unwrap_or_default());
        let disponibilidad = self
            .reservas
            .check_availability(&barbero, &fecha, &hora, duracion)
            .await?;

        let mut borradores = self.borradores.write().await;
        let borrador = borradores.get_mut(&id).ok_or(AppError::NotFound)?;
        borrador.barbero = Some(barbero);
        borrador.fecha = Some(fecha);
        borrador.hora = Some(hora);
        if disponibilidad.disponible {
            borrador.paso = borrador.paso.max(PasoWizard::Confirmacion);
        } else {
            borrador.paso = PasoWizard::Horario;
        }
        Ok((borrador.clone(), disponibilidad))
    }

    // Paso 4: el resumen se confirma y recién ahí se crea la reserva.
    // "Crear Reserva" y "Enviar al Barbero" terminan en esta misma
    // llamada. Si la creación falla, el borrador queda intacto para
    // reintentar sin perder lo cargado.
    pub async fn confirmar(&self, id: Uuid, notas: Option<String>) -> Result<Reserva, AppError> {
        let borrador = self.get(id).await?;
        if borrador.paso < PasoWizard::Confirmacion {
            return Err(AppError::Validation(
                "El borrador aún no pasó el chequeo de disponibilidad".into(),
            ));
        }

        let solicitud = SolicitudReserva {
            cliente: borrador.cliente,
            telefono: borrador.telefono,
            email: borrador.email,
            servicio: borrador.servicio,
            servicio_personalizado: Some(borrador.servicio_personalizado),
            barbero: borrador.barbero,
            barberia: borrador.barberia,
            fecha: borrador.fecha,
            hora: borrador.hora,
            duracion: None,
            notas: notas.or(borrador.notas),
            prioridad: None,
        };

        let reserva = self.reservas.create_reserva(solicitud).await?;
        self.borradores.write().await.remove(&id);
        Ok(reserva)
    }

    // Abandono: el borrador se descarta y nada quedó persistido.
    pub async fn abandonar(&self, id: Uuid) -> Result<(), AppError> {
        self.borradores
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::reserva_repo::mem::MemStore;
    use crate::models::reserva::EstadoReserva;
    use crate::services::notificaciones::Notificador;

    fn wizard_de_prueba() -> (WizardService, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        let reservas = ReservaService::new(store.clone(), Notificador::disabled());
        (WizardService::new(reservas), store)
    }

    async fn hasta_confirmacion(wizard: &WizardService) -> Uuid {
        let borrador = wizard.start().await;
        wizard
            .set_identidad(
                borrador.id,
                "Juan Pérez".into(),
                "+57 300 123 4567".into(),
                None,
                BarberiaId::Principal,
            )
            .await
            .unwrap();
        wizard
            .set_servicio(borrador.id, "Corte + Barba".into(), None)
            .await
            .unwrap();
        let (paso3, disponibilidad) = wizard
            .set_horario(borrador.id, "Carlos Ruiz".into(), "2024-01-15".into(), "10:00".into())
            .await
            .unwrap();
        assert!(disponibilidad.disponible);
        assert_eq!(paso3.paso, PasoWizard::Confirmacion);
        borrador.id
    }

    #[tokio::test]
    async fn flujo_completo_hasta_crear_la_reserva() {
        let (wizard, store) = wizard_de_prueba();
        let id = hasta_confirmacion(&wizard).await;

        let reserva = wizard.confirmar(id, Some("primera visita".into())).await.unwrap();
        assert_eq!(reserva.estado, EstadoReserva::PendienteBarbero);
        assert_eq!(reserva.cliente, "Juan Pérez");
        assert_eq!(reserva.notas, "primera visita");
        assert_eq!(store.creates(), 1);

        // El borrador se consumió al confirmar.
        assert!(matches!(wizard.get(id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn no_se_puede_saltar_pasos() {
        let (wizard, store) = wizard_de_prueba();
        let borrador = wizard.start().await;

        assert!(matches!(
            wizard.set_servicio(borrador.id, "Corte + Barba".into(), None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            wizard
                .set_horario(borrador.id, "Carlos Ruiz".into(), "2024-01-15".into(), "10:00".into())
                .await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            wizard.confirmar(borrador.id, None).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn el_barbero_debe_ser_del_plantel_de_la_barberia() {
        let (wizard, _) = wizard_de_prueba();
        let borrador = wizard.start().await;
        wizard
            .set_identidad(borrador.id, "Juan".into(), "300".into(), None, BarberiaId::Norte)
            .await
            .unwrap();
        wizard
            .set_servicio(borrador.id, "Corte Clásico Hombre".into(), None)
            .await
            .unwrap();

        // Carlos Ruiz atiende en la principal, no en el norte.
        assert!(matches!(
            wizard
                .set_horario(borrador.id, "Carlos Ruiz".into(), "2024-01-15".into(), "10:00".into())
                .await,
            Err(AppError::Validation(_))
        ));

        // Miguel Torres existe pero está marcado no disponible.
        let borrador2 = wizard.start().await;
        wizard
            .set_identidad(borrador2.id, "Juan".into(), "300".into(), None, BarberiaId::Principal)
            .await
            .unwrap();
        wizard
            .set_servicio(borrador2.id, "Corte Clásico Hombre".into(), None)
            .await
            .unwrap();
        assert!(matches!(
            wizard
                .set_horario(borrador2.id, "Miguel Torres".into(), "2024-01-15".into(), "10:00".into())
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn conflicto_de_franja_devuelve_alternativas_y_no_avanza() {
        let (wizard, _) = wizard_de_prueba();

        // Primera reserva ocupa 10:00 x 45 de Carlos.
        let primera = hasta_confirmacion(&wizard).await;
        wizard.confirmar(primera, None).await.unwrap();

        let borrador = wizard.start().await;
        wizard
            .set_identidad(borrador.id, "Otra Persona".into(), "301".into(), None, BarberiaId::Principal)
            .await
            .unwrap();
        wizard
            .set_servicio(borrador.id, "Afeitado Clásico".into(), None)
            .await
            .unwrap();
        let (paso3, disponibilidad) = wizard
            .set_horario(borrador.id, "Carlos Ruiz".into(), "2024-01-15".into(), "10:30".into())
            .await
            .unwrap();

        assert!(!disponibilidad.disponible);
        assert!(!disponibilidad.alternativas.is_empty());
        assert_eq!(paso3.paso, PasoWizard::Horario);
        assert!(matches!(
            wizard.confirmar(borrador.id, None).await,
            Err(AppError::Validation(_))
        ));

        // Tomando una alternativa sugerida, el flujo sigue.
        let franja = disponibilidad.alternativas[0].clone();
        let (paso3, disponibilidad) = wizard
            .set_horario(borrador.id, "Carlos Ruiz".into(), "2024-01-15".into(), franja)
            .await
            .unwrap();
        assert!(disponibilidad.disponible);
        assert_eq!(paso3.paso, PasoWizard::Confirmacion);
        wizard.confirmar(borrador.id, None).await.unwrap();
    }

    #[tokio::test]
    async fn cambiar_de_barberia_descarta_el_barbero_elegido() {
        let (wizard, _) = wizard_de_prueba();
        let id = hasta_confirmacion(&wizard).await;

        let borrador = wizard
            .set_identidad(id, "Juan Pérez".into(), "+57 300 123 4567".into(), None, BarberiaId::Sur)
            .await
            .unwrap();
        assert_eq!(borrador.barbero, None);
        assert!(borrador.paso < PasoWizard::Confirmacion);
    }

    #[tokio::test]
    async fn abandonar_descarta_sin_persistir() {
        let (wizard, store) = wizard_de_prueba();
        let id = hasta_confirmacion(&wizard).await;

        wizard.abandonar(id).await.unwrap();
        assert!(matches!(wizard.get(id).await, Err(AppError::NotFound)));
        assert_eq!(store.creates(), 0);
        assert!(matches!(wizard.abandonar(id).await, Err(AppError::NotFound)));
    }
}
