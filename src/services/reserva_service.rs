// src/services/reserva_service.rs
//
// El motor de ciclo de vida de las reservas. Todo cambio de estado pasa
// por acá: validación de campos requeridos, tabla de transiciones y el
// anexo a la bitácora. Los controladores (wizard y panel admin) no tocan
// el repositorio directamente para nada que mueva el estado.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservaStore,
    models::{
        catalogo,
        reserva::{
            CambiosReserva, EstadoReserva, FiltroReservas, NuevaReserva, Prioridad, Reserva,
            SolicitudReserva,
        },
    },
    services::{
        disponibilidad,
        notificaciones::{Notificador, TipoNotificacion},
    },
};

// Resultado del chequeo de disponibilidad para el paso 3 del wizard.
// `alternativas` solo trae franjas cuando la hora pedida choca.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Disponibilidad {
    pub disponible: bool,
    #[schema(example = json!(["09:00", "11:00", "14:00"]))]
    pub alternativas: Vec<String>,
}

// Edición libre del admin: nunca cambia el estado.
#[derive(Debug, Clone, Default)]
pub struct ModificarReserva {
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub barbero: Option<String>,
    pub notas: Option<String>,
}

#[derive(Clone)]
pub struct ReservaService {
    repo: Arc<dyn ReservaStore>,
    notificador: Notificador,
}

impl ReservaService {
    pub fn new(repo: Arc<dyn ReservaStore>, notificador: Notificador) -> Self {
        Self { repo, notificador }
    }

    pub async fn list(&self, filtro: &FiltroReservas) -> Result<Vec<Reserva>, AppError> {
        self.repo.list(filtro).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Reserva, AppError> {
        self.repo.get(id).await
    }

    // --- Disponibilidad ---

    pub async fn check_availability(
        &self,
        barbero: &str,
        fecha: &str,
        hora: &str,
        duracion: i32,
    ) -> Result<Disponibilidad, AppError> {
        validar_fecha(fecha)?;
        validar_hora(hora)?;
        validar_duracion(hora, duracion)?;
        let existentes = self.repo.list(&FiltroReservas::default()).await?;
        let disponible = disponibilidad::esta_disponible(barbero, fecha, hora, duracion, &existentes);
        let alternativas = if disponible {
            Vec::new()
        } else {
            disponibilidad::sugerir_alternativas(barbero, fecha, duracion, &existentes)
        };
        Ok(Disponibilidad { disponible, alternativas })
    }

    // --- Creación ---

    // Valida el borrador, aplica defaults, verifica que la franja esté
    // libre y recién ahí persiste. Si falta cualquier campo requerido no
    // se toca el repositorio.
    pub async fn create_reserva(&self, solicitud: SolicitudReserva) -> Result<Reserva, AppError> {
        let cliente = requerido(&solicitud.cliente, "cliente")?;
        let servicio = requerido(&solicitud.servicio, "servicio")?;
        let barbero = requerido(&solicitud.barbero, "barbero")?;
        let fecha = requerido(&solicitud.fecha, "fecha")?;
        let hora = requerido(&solicitud.hora, "hora")?;
        let barberia = solicitud
            .barberia
            .ok_or_else(|| AppError::Validation("Falta el campo barberia".into()))?;

        validar_fecha(&fecha)?;
        validar_hora(&hora)?;

        let duracion = solicitud
            .duracion
            .unwrap_or_else(|| catalogo::duracion_de(&servicio));
        validar_duracion(&hora, duracion)?;

        let existentes = self.repo.list(&FiltroReservas::default()).await?;
        if !disponibilidad::esta_disponible(&barbero, &fecha, &hora, duracion, &existentes) {
            return Err(AppError::Validation(format!(
                "{barbero} no está disponible el {fecha} a las {hora}"
            )));
        }

        let nueva = NuevaReserva {
            cliente,
            telefono: solicitud.telefono.unwrap_or_default(),
            email: solicitud.email.unwrap_or_default(),
            servicio,
            servicio_personalizado: solicitud.servicio_personalizado.unwrap_or_default(),
            barbero,
            barberia,
            fecha,
            hora,
            duracion,
            estado: EstadoReserva::PendienteBarbero,
            notas: solicitud.notas.unwrap_or_default(),
            historial: vec![
                "Reserva creada".to_string(),
                "Esperando confirmación del barbero".to_string(),
            ],
            modificable: true,
            prioridad: solicitud.prioridad.unwrap_or(Prioridad::Normal),
        };

        let reserva = self.repo.create(nueva).await?;
        self.notificador.dispatch(&reserva, TipoNotificacion::Creada);
        Ok(reserva)
    }

    // --- Transiciones ---

    // El barbero acepta la cita; también cierra el circuito cuando el
    // cliente confirma una reagenda propuesta.
    pub async fn accept(&self, id: Uuid) -> Result<Reserva, AppError> {
        let actual = self.repo.get(id).await?;
        let entrada = match actual.estado {
            EstadoReserva::PendienteCliente => "Reagenda confirmada por el cliente",
            _ => "Reserva confirmada por el barbero",
        };
        self.transicionar(actual, EstadoReserva::Confirmada, entrada, TipoNotificacion::Confirmada)
            .await
    }

    pub async fn reject(&self, id: Uuid) -> Result<Reserva, AppError> {
        let actual = self.repo.get(id).await?;
        if actual.estado == EstadoReserva::Confirmada {
            // Rechazar es cosa de estados pendientes; una confirmada se cancela.
            return Err(AppError::InvalidTransition {
                desde: actual.estado,
                hacia: EstadoReserva::Cancelada,
            });
        }
        self.transicionar(
            actual,
            EstadoReserva::Cancelada,
            "Reserva rechazada por el barbero",
            TipoNotificacion::Rechazada,
        )
        .await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Reserva, AppError> {
        let actual = self.repo.get(id).await?;
        self.transicionar(
            actual,
            EstadoReserva::Cancelada,
            "Reserva cancelada",
            TipoNotificacion::Cancelada,
        )
        .await
    }

    pub async fn complete(&self, id: Uuid) -> Result<Reserva, AppError> {
        let actual = self.repo.get(id).await?;
        self.transicionar(
            actual,
            EstadoReserva::Completada,
            "Reserva completada",
            TipoNotificacion::Completada,
        )
        .await
    }

    // La barbería propone otra franja y la pelota queda del lado del
    // cliente. Ojo: la nueva franja no pasa por el chequeo de
    // disponibilidad; el barbero ya decidió cuándo puede atender.
    pub async fn propose_reschedule(
        &self,
        id: Uuid,
        fecha: String,
        hora: String,
    ) -> Result<Reserva, AppError> {
        validar_fecha(&fecha)?;
        validar_hora(&hora)?;

        let actual = self.repo.get(id).await?;
        validar_transicion(actual.estado, EstadoReserva::PendienteCliente)?;

        let entrada = format!("Barbería propuso reagendar a {fecha} {hora}");
        let cambios = CambiosReserva {
            fecha: Some(fecha),
            hora: Some(hora),
            estado: Some(EstadoReserva::PendienteCliente),
            agregar_historial: vec![entrada],
            ..Default::default()
        };
        let reserva = self.repo.patch(id, cambios).await?;
        self.notificador.dispatch(&reserva, TipoNotificacion::Reagendada);
        Ok(reserva)
    }

    // Edición libre del admin (fecha/hora/barbero/notas). No toca el
    // estado, pero sí deja constancia en la bitácora.
    pub async fn modify(&self, id: Uuid, cambios: ModificarReserva) -> Result<Reserva, AppError> {
        if let Some(fecha) = &cambios.fecha {
            validar_fecha(fecha)?;
        }
        if let Some(hora) = &cambios.hora {
            validar_hora(hora)?;
        }

        let entrada = format!("Reserva modificada {}", Utc::now().format("%Y-%m-%d %H:%M"));
        let parche = CambiosReserva {
            fecha: cambios.fecha,
            hora: cambios.hora,
            barbero: cambios.barbero,
            notas: cambios.notas,
            estado: None,
            agregar_historial: vec![entrada],
        };
        self.repo.patch(id, parche).await
    }

    // Borrado duro: el registro deja de existir, sin transición ni
    // entrada de bitácora.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.remove(id).await
    }

    async fn transicionar(
        &self,
        actual: Reserva,
        hacia: EstadoReserva,
        entrada: &str,
        tipo: TipoNotificacion,
    ) -> Result<Reserva, AppError> {
        validar_transicion(actual.estado, hacia)?;
        let cambios = CambiosReserva {
            estado: Some(hacia),
            agregar_historial: vec![entrada.to_string()],
            ..Default::default()
        };
        let reserva = self.repo.patch(actual.id, cambios).await?;
        self.notificador.dispatch(&reserva, tipo);
        Ok(reserva)
    }
}

// La tabla de transiciones. Cancelada y completada son terminales: desde
// ahí el motor no se mueve más (la edición de campos sueltos vía
// `modify` sigue permitida, eso no es una transición).
fn validar_transicion(desde: EstadoReserva, hacia: EstadoReserva) -> Result<(), AppError> {
    use EstadoReserva::*;
    let permitida = matches!(
        (desde, hacia),
        (PendienteBarbero, Confirmada)
            | (PendienteBarbero, Cancelada)
            | (PendienteBarbero, PendienteCliente)
            | (PendienteCliente, Confirmada)
            | (PendienteCliente, Cancelada)
            | (Confirmada, Cancelada)
            | (Confirmada, Completada)
    );
    if permitida {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { desde, hacia })
    }
}

fn requerido(valor: &Option<String>, campo: &str) -> Result<String, AppError> {
    match valor {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(AppError::Validation(format!("Falta el campo {campo}"))),
    }
}

fn validar_fecha(fecha: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(fecha, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Fecha inválida: {fecha}")))
}

fn validar_hora(hora: &str) -> Result<(), AppError> {
    disponibilidad::hora_a_minutos(hora)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Hora inválida: {hora}")))
}

// Cota superior además de la inferior: la cita tiene que caber entre la
// hora de inicio y la medianoche. También acota la aritmética de
// solapes, que trabaja en minutos i32.
fn validar_duracion(hora: &str, duracion: i32) -> Result<(), AppError> {
    if duracion < 1 {
        return Err(AppError::Validation(
            "La duración debe ser de al menos 1 minuto".into(),
        ));
    }
    let inicio = disponibilidad::hora_a_minutos(hora)
        .ok_or_else(|| AppError::Validation(format!("Hora inválida: {hora}")))?;
    if duracion > disponibilidad::MINUTOS_DIA - inicio {
        return Err(AppError::Validation(
            "La cita no puede extenderse más allá de la medianoche".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::reserva_repo::mem::MemStore;
    use crate::models::reserva::{BarberiaId, ServicioPersonalizado};

    fn servicio_de_prueba() -> (ReservaService, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        let servicio = ReservaService::new(store.clone(), Notificador::disabled());
        (servicio, store)
    }

    fn solicitud_completa() -> SolicitudReserva {
        SolicitudReserva {
            cliente: Some("Juan Pérez".into()),
            telefono: Some("+57 300 123 4567".into()),
            email: Some("juan@example.com".into()),
            servicio: Some("Corte + Barba".into()),
            servicio_personalizado: Some(ServicioPersonalizado::default()),
            barbero: Some("Carlos Ruiz".into()),
            barberia: Some(BarberiaId::Principal),
            fecha: Some("2024-01-15".into()),
            hora: Some("10:00".into()),
            duracion: None,
            notas: None,
            prioridad: None,
        }
    }

    #[tokio::test]
    async fn escenario_completo_crear_y_aceptar() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        assert_eq!(reserva.estado, EstadoReserva::PendienteBarbero);
        assert_eq!(
            reserva.historial,
            vec!["Reserva creada", "Esperando confirmación del barbero"]
        );
        // Duración tomada del catálogo para "Corte + Barba".
        assert_eq!(reserva.duracion, 45);

        let confirmada = servicio.accept(reserva.id).await.unwrap();
        assert_eq!(confirmada.estado, EstadoReserva::Confirmada);
        assert_eq!(confirmada.historial.len(), 3);
        assert_eq!(confirmada.historial[2], "Reserva confirmada por el barbero");
    }

    #[tokio::test]
    async fn la_validacion_corta_antes_de_tocar_el_repositorio() {
        let (servicio, store) = servicio_de_prueba();

        let casos: Vec<Box<dyn Fn(&mut SolicitudReserva)>> = vec![
            Box::new(|s| s.cliente = None),
            Box::new(|s| s.servicio = None),
            Box::new(|s| s.barbero = None),
            Box::new(|s| s.fecha = None),
            Box::new(|s| s.hora = None),
            Box::new(|s| s.barberia = None),
            Box::new(|s| s.cliente = Some("   ".into())),
        ];

        for mutar in casos {
            let mut solicitud = solicitud_completa();
            mutar(&mut solicitud);
            let resultado = servicio.create_reserva(solicitud).await;
            assert!(matches!(resultado, Err(AppError::Validation(_))));
        }
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn rechaza_formatos_invalidos_de_fecha_y_hora() {
        let (servicio, store) = servicio_de_prueba();

        let mut solicitud = solicitud_completa();
        solicitud.fecha = Some("15/01/2024".into());
        assert!(matches!(
            servicio.create_reserva(solicitud).await,
            Err(AppError::Validation(_))
        ));

        let mut solicitud = solicitud_completa();
        solicitud.hora = Some("25:00".into());
        assert!(matches!(
            servicio.create_reserva(solicitud).await,
            Err(AppError::Validation(_))
        ));

        let mut solicitud = solicitud_completa();
        solicitud.duracion = Some(0);
        assert!(matches!(
            servicio.create_reserva(solicitud).await,
            Err(AppError::Validation(_))
        ));

        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn la_duracion_no_puede_pasar_de_medianoche() {
        let (servicio, store) = servicio_de_prueba();

        // Una duración gigante no entra ni envenena la agenda.
        let mut desbordada = solicitud_completa();
        desbordada.duracion = Some(i32::MAX);
        assert!(matches!(
            servicio.create_reserva(desbordada).await,
            Err(AppError::Validation(_))
        ));

        // Arranca a las 23:50 con 30 minutos: cruza medianoche.
        let mut nocturna = solicitud_completa();
        nocturna.hora = Some("23:50".into());
        nocturna.duracion = Some(30);
        assert!(matches!(
            servicio.create_reserva(nocturna).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.creates(), 0);

        // El chequeo de disponibilidad aplica la misma cota.
        assert!(matches!(
            servicio
                .check_availability("Carlos Ruiz", "2024-01-15", "10:00", i32::MAX)
                .await,
            Err(AppError::Validation(_))
        ));

        // El caso límite sí cabe: 23:30 + 30 termina justo a medianoche.
        let mut al_filo = solicitud_completa();
        al_filo.hora = Some("23:30".into());
        al_filo.duracion = Some(30);
        servicio.create_reserva(al_filo).await.unwrap();
    }

    #[tokio::test]
    async fn no_permite_doble_reserva_del_mismo_barbero() {
        let (servicio, store) = servicio_de_prueba();

        servicio.create_reserva(solicitud_completa()).await.unwrap();

        // Mismo barbero, 10:30 dentro de los 45 minutos de la primera.
        let mut solapada = solicitud_completa();
        solapada.cliente = Some("Otra Persona".into());
        solapada.hora = Some("10:30".into());
        solapada.duracion = Some(30);
        assert!(matches!(
            servicio.create_reserva(solapada).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.creates(), 1);

        // La misma franja con otro barbero sí entra.
        let mut otro_barbero = solicitud_completa();
        otro_barbero.barbero = Some("Ana López".into());
        otro_barbero.hora = Some("10:30".into());
        servicio.create_reserva(otro_barbero).await.unwrap();
    }

    #[tokio::test]
    async fn una_franja_cancelada_queda_libre_de_nuevo() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        servicio.reject(reserva.id).await.unwrap();

        let mut misma_franja = solicitud_completa();
        misma_franja.cliente = Some("Otra Persona".into());
        servicio.create_reserva(misma_franja).await.unwrap();
    }

    #[tokio::test]
    async fn cada_operacion_agrega_exactamente_una_entrada() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        let base = reserva.historial.len();

        let r = servicio.accept(reserva.id).await.unwrap();
        assert_eq!(r.historial.len(), base + 1);

        let r = servicio
            .modify(reserva.id, ModificarReserva { notas: Some("llega tarde".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(r.historial.len(), base + 2);

        let r = servicio.complete(reserva.id).await.unwrap();
        assert_eq!(r.historial.len(), base + 3);
        // Nada se recortó ni se reordenó.
        assert_eq!(r.historial[0], "Reserva creada");
    }

    #[tokio::test]
    async fn reagendar_mueve_fecha_hora_y_estado() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        let reagendada = servicio
            .propose_reschedule(reserva.id, "2024-01-16".into(), "16:00".into())
            .await
            .unwrap();

        assert_eq!(reagendada.estado, EstadoReserva::PendienteCliente);
        assert_eq!(reagendada.fecha, "2024-01-16");
        assert_eq!(reagendada.hora, "16:00");
        assert_eq!(
            reagendada.historial.last().unwrap(),
            "Barbería propuso reagendar a 2024-01-16 16:00"
        );

        // El cliente confirma la propuesta.
        let confirmada = servicio.accept(reserva.id).await.unwrap();
        assert_eq!(confirmada.estado, EstadoReserva::Confirmada);
        assert_eq!(
            confirmada.historial.last().unwrap(),
            "Reagenda confirmada por el cliente"
        );
    }

    #[tokio::test]
    async fn los_estados_terminales_no_se_mueven_mas() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        servicio.reject(reserva.id).await.unwrap();

        assert!(matches!(
            servicio.accept(reserva.id).await,
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(matches!(
            servicio.propose_reschedule(reserva.id, "2024-01-16".into(), "16:00".into()).await,
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(matches!(
            servicio.complete(reserva.id).await,
            Err(AppError::InvalidTransition { .. })
        ));

        // La edición de campos sueltos sigue permitida y no toca el estado.
        let editada = servicio
            .modify(reserva.id, ModificarReserva { notas: Some("cliente avisó".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(editada.estado, EstadoReserva::Cancelada);
    }

    #[tokio::test]
    async fn rechazar_una_confirmada_no_es_valido_pero_cancelar_si() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        servicio.accept(reserva.id).await.unwrap();

        assert!(matches!(
            servicio.reject(reserva.id).await,
            Err(AppError::InvalidTransition { .. })
        ));

        let cancelada = servicio.cancel(reserva.id).await.unwrap();
        assert_eq!(cancelada.estado, EstadoReserva::Cancelada);
        assert_eq!(cancelada.historial.last().unwrap(), "Reserva cancelada");
    }

    #[tokio::test]
    async fn listar_dos_veces_sin_mutaciones_da_lo_mismo() {
        let (servicio, _) = servicio_de_prueba();

        servicio.create_reserva(solicitud_completa()).await.unwrap();
        let mut otra = solicitud_completa();
        otra.cliente = Some("Ana Gómez".into());
        otra.hora = Some("14:00".into());
        servicio.create_reserva(otra).await.unwrap();

        let filtro = FiltroReservas::default();
        let primera = servicio.list(&filtro).await.unwrap();
        let segunda = servicio.list(&filtro).await.unwrap();
        assert_eq!(primera, segunda);
        assert_eq!(primera.len(), 2);
    }

    #[tokio::test]
    async fn filtra_por_texto_y_estado() {
        let (servicio, _) = servicio_de_prueba();

        let r1 = servicio.create_reserva(solicitud_completa()).await.unwrap();
        let mut otra = solicitud_completa();
        otra.cliente = Some("Ana Gómez".into());
        otra.barbero = Some("Ana López".into());
        otra.hora = Some("14:00".into());
        servicio.create_reserva(otra).await.unwrap();
        servicio.accept(r1.id).await.unwrap();

        let por_texto = servicio
            .list(&FiltroReservas { q: Some("juan".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(por_texto.len(), 1);
        assert_eq!(por_texto[0].cliente, "Juan Pérez");

        let confirmadas = servicio
            .list(&FiltroReservas { estado: Some(EstadoReserva::Confirmada), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(confirmadas.len(), 1);
    }

    #[tokio::test]
    async fn eliminar_borra_de_verdad() {
        let (servicio, _) = servicio_de_prueba();

        let reserva = servicio.create_reserva(solicitud_completa()).await.unwrap();
        servicio.delete(reserva.id).await.unwrap();

        assert!(matches!(servicio.get(reserva.id).await, Err(AppError::NotFound)));
        assert!(matches!(servicio.delete(reserva.id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn modificar_un_id_inexistente_da_not_found() {
        let (servicio, _) = servicio_de_prueba();

        let cambios = ModificarReserva { notas: Some("no existe".into()), ..Default::default() };
        assert!(matches!(
            servicio.modify(Uuid::new_v4(), cambios).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn disponibilidad_reporta_alternativas_solo_en_conflicto() {
        let (servicio, _) = servicio_de_prueba();
        servicio.create_reserva(solicitud_completa()).await.unwrap();

        let libre = servicio
            .check_availability("Carlos Ruiz", "2024-01-15", "16:00", 30)
            .await
            .unwrap();
        assert!(libre.disponible);
        assert!(libre.alternativas.is_empty());

        let ocupada = servicio
            .check_availability("Carlos Ruiz", "2024-01-15", "10:30", 30)
            .await
            .unwrap();
        assert!(!ocupada.disponible);
        assert_eq!(ocupada.alternativas.len(), 3);
    }
}
